// ── Core error types ──
//
// Errors surfaced by the engine. Backend-reported messages are kept
// verbatim; transport and parse failures collapse into one fixed,
// localized message because the user cannot act on their details.

use thiserror::Error;

use crate::i18n::Localizer;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend ──────────────────────────────────────────────────────
    /// The backend answered with an error message (non-2xx status or
    /// `ok: false`).
    #[error("{message}")]
    Backend { message: String, status: Option<u16> },

    /// No usable response: network failure or a body that could not be
    /// parsed.
    #[error("Backend unreachable or returned garbage: {detail}")]
    Unreadable { detail: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Settings persistence ─────────────────────────────────────────
    #[error("Failed to persist settings: {message}")]
    Settings { message: String },
}

impl CoreError {
    /// Text to show the user in an alert.
    pub fn user_message(&self, l10n: Localizer) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::Unreadable { .. } => l10n.t("err.invalidJson"),
            Self::Config { message } | Self::Settings { message } => message.clone(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hotspot_api::Error> for CoreError {
    fn from(err: hotspot_api::Error) -> Self {
        match err {
            hotspot_api::Error::Http { status, message } => CoreError::Backend {
                message,
                status: Some(status),
            },
            hotspot_api::Error::Backend { message } => CoreError::Backend {
                message,
                status: None,
            },
            hotspot_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid backend URL: {e}"),
            },
            err @ (hotspot_api::Error::Transport(_)
            | hotspot_api::Error::InvalidResponse { .. }
            | hotspot_api::Error::Deserialization { .. }) => CoreError::Unreadable {
                detail: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn backend_messages_pass_through() {
        let err = CoreError::from(hotspot_api::Error::Backend {
            message: "SSID too long".into(),
        });
        assert_eq!(err.user_message(Localizer::new(Language::En)), "SSID too long");
    }

    #[test]
    fn parse_failures_are_localized() {
        let err = CoreError::from(hotspot_api::Error::InvalidResponse {
            body: "<html>".into(),
        });
        assert_eq!(
            err.user_message(Localizer::new(Language::En)),
            "Response is not valid JSON"
        );
        assert_eq!(
            err.user_message(Localizer::new(Language::Zh)),
            "响应不是有效 JSON"
        );
    }
}
