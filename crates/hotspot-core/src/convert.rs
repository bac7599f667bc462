// ── API-to-domain type conversions ──
//
// Bridges raw `hotspot_api` payloads into `hotspot_core::model` types.
// The backend is loosely typed; everything here is infallible and fills
// defaults for missing or malformed data.

use serde_json::Value;

use hotspot_api::{ConfigForm, RawChannelOptions, RawClient, RawConfig};

use crate::model::{Band, ChannelCapability, ClientRecord, HotspotConfig, MacAddress, StatusSnapshot};
use crate::options::is_channel_valid_for_band;

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a channel field. Empty or non-numeric means "no preference" (0).
pub(crate) fn parse_channel(raw: &str) -> u16 {
    raw.trim().parse().unwrap_or(0)
}

fn strict_bool(status: &Value, field: &str) -> bool {
    status.get(field) == Some(&Value::Bool(true))
}

// ── Configuration ──────────────────────────────────────────────────

impl From<RawConfig> for HotspotConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            band: Band::from_code(&raw.band),
            channel: parse_channel(&raw.channel),
            iface: raw.iface,
            uplink_iface: raw.uplink_iface,
            ip_cidr: raw.ip_cidr,
            allow_ports: raw.allow_ports,
            ssid: raw.ssid,
            password: raw.password,
        }
    }
}

impl From<RawChannelOptions> for ChannelCapability {
    fn from(raw: RawChannelOptions) -> Self {
        Self {
            bg: raw.bg,
            a: raw.a,
        }
    }
}

/// Serialize a configuration for `config_set`: every text field trimmed
/// except the password. A channel outside the band's range is replaced by
/// the band default.
impl From<&HotspotConfig> for ConfigForm {
    fn from(cfg: &HotspotConfig) -> Self {
        let band = cfg.band.code();
        let channel = cfg.channel.to_string();
        Self {
            iface: cfg.iface.trim().to_owned(),
            uplink_iface: cfg.uplink_iface.trim().to_owned(),
            ip_cidr: cfg.ip_cidr.trim().to_owned(),
            allow_ports: cfg.allow_ports.trim().to_owned(),
            ssid: cfg.ssid.trim().to_owned(),
            password: cfg.password.clone(),
            band: band.to_owned(),
            channel: if is_channel_valid_for_band(&channel, band) {
                channel
            } else {
                cfg.band.default_channel().to_string()
            },
        }
    }
}

// ── Status ─────────────────────────────────────────────────────────

impl From<Option<Value>> for StatusSnapshot {
    fn from(raw: Option<Value>) -> Self {
        let raw = raw.unwrap_or(Value::Null);
        Self {
            running: strict_bool(&raw, "running"),
            internet_ok: raw.get("internetOk").and_then(Value::as_bool),
            will_disconnect_sta: strict_bool(&raw, "willDisconnectSta"),
            sta_ap_concurrent: strict_bool(&raw, "staApConcurrent"),
            parent_active_connection: raw
                .get("parentActiveConnection")
                .and_then(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .filter(|s| !s.is_empty()),
            raw,
        }
    }
}

// ── Clients ────────────────────────────────────────────────────────

impl From<RawClient> for ClientRecord {
    fn from(raw: RawClient) -> Self {
        Self {
            mac: MacAddress::new(&raw.mac),
            hostname: raw.hostname,
            ip: raw.ip,
            signal_dbm: raw
                .signal_dbm
                .or(raw.signal)
                .and_then(|n| i32::try_from(n).ok()),
            connected_seconds: raw.connected_seconds.and_then(|n| u64::try_from(n).ok()),
            rx_bytes: raw.rx_bytes.and_then(|n| u64::try_from(n).ok()),
            tx_bytes: raw.tx_bytes.and_then(|n| u64::try_from(n).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn config_parses_band_and_channel() {
        let cfg = HotspotConfig::from(RawConfig {
            band: "weird".into(),
            channel: "abc".into(),
            ssid: "lab".into(),
            ..RawConfig::default()
        });
        assert_eq!(cfg.band, Band::Bg);
        assert_eq!(cfg.channel, 0);
        assert_eq!(cfg.ssid, "lab");
    }

    #[test]
    fn form_trims_everything_but_password() {
        let cfg = HotspotConfig {
            ssid: "  lab ".into(),
            password: " secret  ".into(),
            band: Band::A,
            channel: 0,
            ..HotspotConfig::default()
        };
        let form = ConfigForm::from(&cfg);
        assert_eq!(form.ssid, "lab");
        assert_eq!(form.password, " secret  ");
        assert_eq!(form.band, "a");
        assert_eq!(form.channel, "36");
    }

    #[test]
    fn form_replaces_channel_outside_band() {
        let mut cfg = HotspotConfig {
            band: Band::A,
            channel: 6,
            ..HotspotConfig::default()
        };
        assert_eq!(ConfigForm::from(&cfg).channel, "36");

        cfg.band = Band::Bg;
        cfg.channel = 11;
        assert_eq!(ConfigForm::from(&cfg).channel, "11");
        cfg.channel = 149;
        assert_eq!(ConfigForm::from(&cfg).channel, "6");
    }

    #[test]
    fn status_flags_are_strict() {
        let st = StatusSnapshot::from(Some(json!({
            "running": "true",
            "internetOk": false,
            "willDisconnectSta": true,
            "staApConcurrent": 1,
            "parentActiveConnection": "HomeNet"
        })));
        assert!(!st.running);
        assert_eq!(st.internet_ok, Some(false));
        assert!(st.will_disconnect_sta);
        assert!(!st.sta_ap_concurrent);
        assert!(st.start_needs_confirmation());
        assert_eq!(st.parent_active_connection.as_deref(), Some("HomeNet"));

        let empty = StatusSnapshot::from(None);
        assert!(!empty.running);
        assert_eq!(empty.internet_ok, None);
    }

    #[test]
    fn client_signal_falls_back_to_legacy_field() {
        let rec = ClientRecord::from(RawClient {
            mac: " AA:BB:CC:DD:EE:FF".into(),
            signal: Some(-61),
            connected_seconds: Some(-5),
            ..RawClient::default()
        });
        assert_eq!(rec.mac.as_str(), "aa:bb:cc:dd:ee:ff");
        assert_eq!(rec.signal_dbm, Some(-61));
        assert_eq!(rec.connected_seconds, None);
        assert!(rec.can_kick());
    }
}
