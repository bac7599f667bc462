// Backend response types
//
// Models for the hotspot backend's JSON endpoints. Every response is a flat
// `{ ok, error?, ...payload }` object; the payload structs below pick out
// their fields and ignore the rest. The backend is loosely typed (numbers
// arrive as strings and vice versa, arrays may be null), so most fields go
// through the lenient deserializers at the bottom of this file.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Configuration ────────────────────────────────────────────────────

/// `config_get` payload: the stored configuration plus the regulatory
/// channel capability of the selected radio.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigGetResponse {
    #[serde(default)]
    pub config: Option<RawConfig>,
    #[serde(default)]
    pub channel_options: Option<RawChannelOptions>,
}

/// Stored hotspot configuration as the backend reports it. All values are
/// kept as strings, the way a form would hold them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub iface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub uplink_iface: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip_cidr: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub allow_ports: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ssid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub band: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub channel: String,
}

/// Allowed channels per band. `None` means the backend did not report an
/// array for that band (capability unknown); `Some(vec![])` means the band
/// is known to have no usable channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawChannelOptions {
    #[serde(default, deserialize_with = "lenient_channel_list")]
    pub bg: Option<Vec<u16>>,
    #[serde(default, deserialize_with = "lenient_channel_list")]
    pub a: Option<Vec<u16>>,
}

/// `config_set` request body, sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigForm {
    pub iface: String,
    pub uplink_iface: String,
    pub ip_cidr: String,
    pub allow_ports: String,
    pub ssid: String,
    pub password: String,
    pub band: String,
    pub channel: String,
}

// ── Status ───────────────────────────────────────────────────────────

/// `status` payload. The status object is passed through untyped so the
/// full snapshot can be displayed; `hotspot-core` extracts typed fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<Value>,
}

// ── Clients ──────────────────────────────────────────────────────────

/// `clients` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub clients: Vec<RawClient>,
}

/// A station associated with the hotspot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClient {
    #[serde(default, deserialize_with = "lenient_string")]
    pub mac: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hostname: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ip: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub signal_dbm: Option<i64>,
    /// Older backends report `signal` instead of `signalDbm`.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub signal: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub connected_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub rx_bytes: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub tx_bytes: Option<i64>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// `ifaces` payload: wireless devices able to host the access point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IfacesResponse {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub ifaces: Vec<String>,
}

/// `uplinks` payload: devices whose connection can be shared.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UplinksResponse {
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub uplinks: Vec<String>,
}

/// Payload of endpoints that only acknowledge (`start`, `stop`, `kick`,
/// `config_set`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: Option<String>,
}

// ── Lenient deserializers ────────────────────────────────────────────

/// Render a scalar the way a form field would: strings as-is, numbers and
/// booleans via their JSON text, `null` as empty.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(value_to_string(&value))
}

fn lenient_i64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(value_to_i64(&value))
}

fn lenient_list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        _ => Vec::new(),
    })
}

fn lenient_channel_list<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Vec<u16>>, D::Error> {
    let value = Value::deserialize(de)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_to_i64)
                .filter_map(|n| u16::try_from(n).ok())
                .filter(|n| *n > 0)
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn config_values_are_stringified() {
        let resp: ConfigGetResponse = serde_json::from_value(json!({
            "config": { "ssid": "lab", "band": "a", "channel": 36, "password": null },
            "channelOptions": { "bg": [1, "6", 11], "a": [] }
        }))
        .unwrap();

        let cfg = resp.config.unwrap();
        assert_eq!(cfg.channel, "36");
        assert_eq!(cfg.password, "");
        assert_eq!(cfg.uplink_iface, "");

        let opts = resp.channel_options.unwrap();
        assert_eq!(opts.bg, Some(vec![1, 6, 11]));
        assert_eq!(opts.a, Some(vec![]));
    }

    #[test]
    fn non_array_channel_options_are_unknown() {
        let opts: RawChannelOptions =
            serde_json::from_value(json!({ "bg": null, "a": "none" })).unwrap();
        assert_eq!(opts.bg, None);
        assert_eq!(opts.a, None);
    }

    #[test]
    fn clients_tolerate_garbage() {
        let resp: ClientsResponse = serde_json::from_value(json!({ "clients": null })).unwrap();
        assert!(resp.clients.is_empty());

        let resp: ClientsResponse = serde_json::from_value(json!({
            "clients": [{ "mac": "AA:BB:CC:DD:EE:FF", "signal": "-52", "rxBytes": 2048 }]
        }))
        .unwrap();
        assert_eq!(resp.clients.len(), 1);
        assert_eq!(resp.clients[0].signal, Some(-52));
        assert_eq!(resp.clients[0].rx_bytes, Some(2048));
        assert_eq!(resp.clients[0].tx_bytes, None);
    }

    #[test]
    fn config_form_is_camel_case() {
        let form = ConfigForm {
            uplink_iface: "eth0".into(),
            channel: "6".into(),
            ..ConfigForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["uplinkIface"], "eth0");
        assert_eq!(value["allowPorts"], "");
    }
}
