// ── Hotspot configuration ──

use serde::{Deserialize, Serialize};

use super::band::Band;

/// Stored hotspot configuration.
///
/// `channel == 0` means "no preference"; it only appears transiently
/// before the channel options have been synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotConfig {
    pub iface: String,
    pub uplink_iface: String,
    pub ip_cidr: String,
    pub allow_ports: String,
    pub ssid: String,
    pub password: String,
    pub band: Band,
    pub channel: u16,
}

/// Allowed channels per band as reported by the backend's regulatory
/// probe. `None` = capability unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCapability {
    pub bg: Option<Vec<u16>>,
    pub a: Option<Vec<u16>>,
}

impl ChannelCapability {
    pub fn for_band(&self, band: Band) -> Option<&[u16]> {
        match band {
            Band::Bg => self.bg.as_deref(),
            Band::A => self.a.as_deref(),
        }
    }

    /// 5GHz is usable unless the backend positively reported an empty list.
    pub fn five_ghz_available(&self) -> bool {
        self.a.as_ref().is_none_or(|channels| !channels.is_empty())
    }
}
