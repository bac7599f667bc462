// ── Hotspot status ──

use serde_json::Value;

/// Typed view of the backend's status object.
///
/// Flags are strict: only a JSON `true` counts. `raw` keeps the full
/// object for the status pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub running: bool,
    /// `None` when the backend did not report connectivity.
    pub internet_ok: Option<bool>,
    /// Starting the hotspot will drop the current station connection.
    pub will_disconnect_sta: bool,
    /// The radio can run station and access point at once.
    pub sta_ap_concurrent: bool,
    pub parent_active_connection: Option<String>,
    pub raw: Value,
}

impl StatusSnapshot {
    /// Starting would disconnect the station and the radio cannot avoid it.
    pub fn start_needs_confirmation(&self) -> bool {
        !self.sta_ap_concurrent && self.will_disconnect_sta
    }

    /// Pretty-printed raw status for display.
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_default()
    }
}
