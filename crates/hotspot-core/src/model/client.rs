// ── Associated stations ──

use super::mac::MacAddress;

/// A station associated with the hotspot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRecord {
    pub mac: MacAddress,
    pub hostname: String,
    pub ip: String,
    pub signal_dbm: Option<i32>,
    pub connected_seconds: Option<u64>,
    pub rx_bytes: Option<u64>,
    pub tx_bytes: Option<u64>,
}

impl ClientRecord {
    /// Kicking needs an address the backend can match exactly.
    pub fn can_kick(&self) -> bool {
        self.mac.is_canonical()
    }
}
