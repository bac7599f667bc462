// ── Configuration form state ──
//
// The editable form plus its dirty flag. Any user edit marks the form
// dirty; a non-forced load never overwrites a dirty form, so background
// refreshes cannot race keystrokes. The flag clears only when a
// configuration is accepted into the form.

use strum::{Display, EnumIter};

use crate::devices::{DeviceRole, DeviceSelect};
use crate::model::{Band, ChannelCapability, HotspotConfig};
use crate::options::{ChannelSelect, resync};

/// Free-text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TextField {
    Ssid,
    Password,
    IpCidr,
    AllowPorts,
}

impl TextField {
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Ssid => "label.ssid",
            Self::Password => "label.password",
            Self::IpCidr => "label.ipCidr",
            Self::AllowPorts => "label.allowPorts",
        }
    }

    pub fn placeholder_key(self) -> Option<&'static str> {
        match self {
            Self::IpCidr => Some("placeholder.ipCidr"),
            Self::AllowPorts => Some("placeholder.allowPorts"),
            Self::Ssid | Self::Password => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    iface: DeviceSelect,
    uplink: DeviceSelect,
    ssid: String,
    password: String,
    ip_cidr: String,
    allow_ports: String,
    band: Band,
    channel: ChannelSelect,
    capability: ChannelCapability,
    /// Whether the 5GHz band may be selected.
    pub band5_available: bool,
    dirty: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            iface: DeviceSelect::empty(DeviceRole::Hotspot),
            uplink: DeviceSelect::empty(DeviceRole::Uplink),
            ssid: String::new(),
            password: String::new(),
            ip_cidr: String::new(),
            allow_ports: String::new(),
            band: Band::Bg,
            channel: ChannelSelect::default(),
            capability: ChannelCapability::default(),
            band5_available: true,
            dirty: false,
        }
    }
}

impl FormState {
    // ── Accessors ────────────────────────────────────────────────────

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn iface(&self) -> &DeviceSelect {
        &self.iface
    }

    pub fn uplink(&self) -> &DeviceSelect {
        &self.uplink
    }

    pub fn band(&self) -> Band {
        self.band
    }

    pub fn channel(&self) -> &ChannelSelect {
        &self.channel
    }

    pub fn capability(&self) -> &ChannelCapability {
        &self.capability
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Ssid => &self.ssid,
            TextField::Password => &self.password,
            TextField::IpCidr => &self.ip_cidr,
            TextField::AllowPorts => &self.allow_ports,
        }
    }

    /// Snapshot of the form as a configuration.
    pub fn read(&self) -> HotspotConfig {
        HotspotConfig {
            iface: self.iface.selected().to_owned(),
            uplink_iface: self.uplink.selected().to_owned(),
            ip_cidr: self.ip_cidr.clone(),
            allow_ports: self.allow_ports.clone(),
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            band: self.band,
            channel: self.channel.selected(),
        }
    }

    // ── User edits ───────────────────────────────────────────────────

    pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
        let slot = match field {
            TextField::Ssid => &mut self.ssid,
            TextField::Password => &mut self.password,
            TextField::IpCidr => &mut self.ip_cidr,
            TextField::AllowPorts => &mut self.allow_ports,
        };
        *slot = value.into();
        self.dirty = true;
    }

    pub fn push_char(&mut self, field: TextField, c: char) {
        let mut value = self.text(field).to_owned();
        value.push(c);
        self.set_text(field, value);
    }

    pub fn pop_char(&mut self, field: TextField) {
        let mut value = self.text(field).to_owned();
        if value.pop().is_some() {
            self.set_text(field, value);
        }
    }

    /// Switch band from the UI. The current channel is kept if the new band
    /// offers it, otherwise the band default is taken. Selecting a disabled
    /// 5GHz band is refused.
    pub fn select_band(&mut self, band: Band) -> bool {
        if band == Band::A && !self.band5_available {
            return false;
        }
        self.band = band;
        self.channel = resync(band, self.channel.selected(), true, &self.capability);
        self.dirty = true;
        true
    }

    pub fn select_channel(&mut self, channel: u16) -> bool {
        let changed = self.channel.select(channel);
        if changed {
            self.dirty = true;
        }
        changed
    }

    pub fn select_device(&mut self, role: DeviceRole, value: &str) -> bool {
        let select = match role {
            DeviceRole::Hotspot => &mut self.iface,
            DeviceRole::Uplink => &mut self.uplink,
        };
        let changed = select.select(value);
        if changed {
            self.dirty = true;
        }
        changed
    }

    // ── Server reconciliation ────────────────────────────────────────

    /// Accept a server configuration into the form unless the user has
    /// unsaved edits. Returns whether the form was overwritten.
    pub fn load(&mut self, cfg: &HotspotConfig, force: bool) -> bool {
        if self.dirty && !force {
            return false;
        }
        self.iface.reselect(&cfg.iface);
        self.uplink.reselect(&cfg.uplink_iface);
        self.ssid.clone_from(&cfg.ssid);
        self.password.clone_from(&cfg.password);
        self.ip_cidr.clone_from(&cfg.ip_cidr);
        self.allow_ports.clone_from(&cfg.allow_ports);
        self.band = cfg.band;
        self.channel = resync(cfg.band, cfg.channel, true, &self.capability);
        self.dirty = false;
        true
    }

    /// Replace the channel capability. The channel options are rebuilt
    /// around the current selection.
    pub fn set_capability(&mut self, capability: ChannelCapability) {
        self.capability = capability;
        self.channel = resync(self.band, self.channel.selected(), false, &self.capability);
    }

    /// Merge freshly reported device lists against the current selections.
    pub fn refresh_devices(&mut self, ifaces: &[String], uplinks: &[String]) {
        self.iface.refresh(ifaces);
        self.uplink.refresh(uplinks);
    }

    pub(crate) fn set_band_unchecked(&mut self, band: Band, capability: &ChannelCapability) {
        self.band = band;
        self.channel = resync(band, self.channel.selected(), true, capability);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::update_band_availability;

    fn server_config() -> HotspotConfig {
        HotspotConfig {
            iface: "wlan0".into(),
            uplink_iface: "eth0".into(),
            ssid: "lab".into(),
            password: "hunter22".into(),
            band: Band::Bg,
            channel: 11,
            ..HotspotConfig::default()
        }
    }

    #[test]
    fn clean_form_accepts_load() {
        let mut form = FormState::default();
        assert!(form.load(&server_config(), false));
        assert!(!form.is_dirty());
        assert_eq!(form.read(), server_config());
    }

    #[test]
    fn dirty_form_survives_unforced_load() {
        let mut form = FormState::default();
        form.load(&server_config(), false);
        form.set_text(TextField::Ssid, "edited");
        let before = form.clone();

        let mut newer = server_config();
        newer.ssid = "server".into();
        newer.channel = 1;
        assert!(!form.load(&newer, false));
        assert_eq!(form, before);
        assert!(form.is_dirty());

        assert!(form.load(&newer, true));
        assert_eq!(form.text(TextField::Ssid), "server");
        assert!(!form.is_dirty());
    }

    #[test]
    fn every_edit_marks_dirty() {
        let edits: [fn(&mut FormState); 5] = [
            |f| f.push_char(TextField::Password, 'x'),
            |f| {
                f.select_band(Band::A);
            },
            |f| {
                f.select_channel(1);
            },
            |f| {
                f.select_device(DeviceRole::Hotspot, "wlan0");
            },
            |f| f.set_text(TextField::AllowPorts, "53"),
        ];
        for edit in edits {
            let mut form = FormState::default();
            form.load(&server_config(), true);
            edit(&mut form);
            assert!(form.is_dirty());
        }
    }

    #[test]
    fn band_change_picks_default_channel() {
        let mut form = FormState::default();
        form.load(&server_config(), true);
        assert!(form.select_band(Band::A));
        assert_eq!(form.channel().selected(), 36);
        assert!(form.select_band(Band::Bg));
        assert_eq!(form.channel().selected(), 6);
    }

    #[test]
    fn unavailable_5ghz_is_corrected_once() {
        let capability = ChannelCapability {
            bg: Some(vec![1, 6, 11]),
            a: Some(vec![]),
        };
        let mut form = FormState::default();
        form.set_capability(capability.clone());
        let mut cfg = server_config();
        cfg.band = Band::A;
        cfg.channel = 36;
        form.load(&cfg, true);

        assert!(update_band_availability(&mut form, &capability));
        assert_eq!(form.band(), Band::Bg);
        assert_eq!(form.channel().options(), &[1, 6, 11]);
        assert_eq!(form.channel().selected(), 6);
        assert!(form.is_dirty());
        assert!(!form.band5_available);

        assert!(!update_band_availability(&mut form, &capability));
        assert!(!form.select_band(Band::A));
    }

    #[test]
    fn load_preserves_missing_device_as_unavailable() {
        let mut form = FormState::default();
        form.refresh_devices(&["wlan1".to_owned()], &[]);
        form.load(&server_config(), true);
        assert_eq!(form.iface().selected(), "wlan0");
        assert_eq!(form.iface().options().len(), 3);
        assert_eq!(form.uplink().selected(), "eth0");
    }
}
