use thiserror::Error;

/// Top-level error type for the `hotspot-api` crate.
///
/// Every backend endpoint answers with a `{ ok, error?, ...payload }`
/// envelope. Failures are split by where they were detected: the transport,
/// the HTTP status line, the envelope's `ok` flag, or payload decoding.
/// `hotspot-core` maps these into user-facing text.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Envelope ────────────────────────────────────────────────────
    /// The response body was not valid JSON.
    #[error("Response is not valid JSON")]
    InvalidResponse { body: String },

    /// Non-2xx HTTP status. `message` is the envelope's `error` field when
    /// present, otherwise the status reason phrase.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The backend answered `ok: false`.
    #[error("{message}")]
    Backend { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The envelope was valid JSON but the payload had an unexpected shape.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` when the backend itself produced the message, so it
    /// can be shown to the user verbatim.
    pub fn is_backend_reported(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Backend { .. })
    }

    /// Returns `true` for failures below the envelope (network or parse).
    pub fn is_transport_or_parse(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::InvalidResponse { .. } | Self::Deserialization { .. }
        )
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
