// Hotspot backend HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, the `lang` query
// parameter, and `{ ok, error?, ... }` envelope unwrapping. The endpoint
// methods live in `endpoints.rs` as inherent methods so this module stays
// focused on transport mechanics.

use std::sync::{PoisonError, RwLock};

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Language sent to the backend before the UI picks one.
pub const DEFAULT_LANGUAGE: &str = "zh";

/// Raw HTTP client for the hotspot backend's CGI endpoints.
///
/// Every request carries `lang=<code>` so the backend can localize its own
/// error strings, and every response is checked for the `ok` flag before the
/// payload reaches the caller.
pub struct HotspotClient {
    http: reqwest::Client,
    base_url: Url,
    /// Active UI language, swapped in place on a live language switch.
    language: RwLock<String>,
}

impl HotspotClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the directory holding the CGI scripts, e.g.
    /// `http://nas.local:5666/app/hotspot/cgi-bin/`. A missing trailing
    /// slash is added so endpoint names join as children.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: directory_url(base_url),
            language: RwLock::new(DEFAULT_LANGUAGE.to_owned()),
        }
    }

    /// The backend base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The language code currently sent with every request.
    pub fn language(&self) -> String {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change the language code sent with subsequent requests.
    pub fn set_language(&self, code: &str) {
        debug!(code, "backend language changed");
        *self
            .language
            .write()
            .unwrap_or_else(PoisonError::into_inner) = code.to_owned();
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}{endpoint}?lang=<code>&<extra...>`.
    pub(crate) fn endpoint_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.base_url.join(endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("lang", &self.language());
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        parse_envelope(status, &body, BodyPolicy::Strict)
    }

    /// Send a form-encoded POST request and unwrap the envelope.
    ///
    /// Write endpoints may answer with an empty or non-JSON body on success,
    /// so the body is parsed leniently.
    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        url: Url,
        form: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self.http.post(url).form(form).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, len = body.len(), "response received");

        parse_envelope(status, &body, BodyPolicy::Lenient)
    }
}

/// How to treat a body that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyPolicy {
    /// Reject with [`Error::InvalidResponse`].
    Strict,
    /// Treat as an empty object.
    Lenient,
}

/// Parse the `{ ok, error?, ...payload }` envelope.
///
/// An empty body counts as `{}`. A non-2xx status fails with the envelope's
/// `error` (or the reason phrase), before `ok` is even looked at.
pub(crate) fn parse_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    policy: BodyPolicy,
) -> Result<T, Error> {
    let parsed: Option<Value> = if body.trim().is_empty() {
        Some(Value::Object(Map::new()))
    } else {
        serde_json::from_str(body).ok()
    };

    if !status.is_success() {
        let message = parsed
            .as_ref()
            .and_then(error_field)
            .unwrap_or_else(|| reason_phrase(status));
        return Err(Error::Http {
            status: status.as_u16(),
            message,
        });
    }

    let value = match (parsed, policy) {
        (Some(value), _) => value,
        (None, BodyPolicy::Lenient) => Value::Object(Map::new()),
        (None, BodyPolicy::Strict) => {
            return Err(Error::InvalidResponse {
                body: body.chars().take(200).collect(),
            });
        }
    };

    if value.get("ok") == Some(&Value::Bool(false)) {
        return Err(Error::Backend {
            message: error_field(&value).unwrap_or_else(|| reason_phrase(status)),
        });
    }

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.chars().take(200).collect(),
    })
}

fn error_field(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
}

fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Ack, StatusResponse};

    #[test]
    fn empty_body_is_an_empty_object() {
        let ack: Ack = parse_envelope(StatusCode::OK, "", BodyPolicy::Strict).unwrap();
        assert!(ack.message.is_none());
    }

    #[test]
    fn non_json_is_rejected_on_strict_reads() {
        let err = parse_envelope::<Ack>(StatusCode::OK, "<html>", BodyPolicy::Strict).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse { .. }));

        let ack = parse_envelope::<Ack>(StatusCode::OK, "<html>", BodyPolicy::Lenient);
        assert!(ack.is_ok());
    }

    #[test]
    fn ok_false_surfaces_error_field() {
        let body = json!({ "ok": false, "error": "hostapd failed" }).to_string();
        let err = parse_envelope::<Ack>(StatusCode::OK, &body, BodyPolicy::Strict).unwrap_err();
        assert_eq!(err.to_string(), "hostapd failed");
    }

    #[test]
    fn http_error_prefers_envelope_message() {
        let body = json!({ "ok": false, "error": "not allowed" }).to_string();
        let err = parse_envelope::<Ack>(StatusCode::FORBIDDEN, &body, BodyPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, Error::Http { status: 403, ref message } if message == "not allowed"));

        let err = parse_envelope::<Ack>(StatusCode::BAD_GATEWAY, "oops", BodyPolicy::Strict)
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad Gateway");
    }

    #[test]
    fn payload_fields_pass_through() {
        let body = json!({ "ok": true, "status": { "running": true } }).to_string();
        let resp: StatusResponse =
            parse_envelope(StatusCode::OK, &body, BodyPolicy::Strict).unwrap();
        assert_eq!(resp.status.unwrap()["running"], true);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = HotspotClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://nas.local/app/cgi-bin").unwrap(),
        );
        assert_eq!(client.base_url().as_str(), "http://nas.local/app/cgi-bin/");

        let url = client.endpoint_url("kick.cgi", &[("mac", "aa:bb")]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://nas.local/app/cgi-bin/kick.cgi?mac=aa%3Abb&lang=zh"
        );
    }
}
