// ── Device list merging ──
//
// Builds the option list for a device selector from what the backend
// reports, without ever dropping the user's current selection.

use indexmap::IndexSet;

use crate::i18n::Localizer;

/// Which selector a device list feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceRole {
    /// The wireless device that hosts the access point.
    Hotspot,
    /// The device whose connection is shared.
    Uplink,
}

impl DeviceRole {
    fn auto_label_key(self) -> &'static str {
        match self {
            Self::Hotspot => "opt.ifaceAuto",
            Self::Uplink => "opt.uplinkAuto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOptionKind {
    /// Let the backend choose (empty value).
    Auto,
    /// Reported by the backend on the last fetch.
    Reported,
    /// The current selection, no longer reported.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceOption {
    pub value: String,
    pub kind: DeviceOptionKind,
}

impl DeviceOption {
    /// Display label, resolved at render time.
    pub fn label(&self, role: DeviceRole, l10n: Localizer) -> String {
        match self.kind {
            DeviceOptionKind::Auto => l10n.t(role.auto_label_key()),
            DeviceOptionKind::Reported => self.value.clone(),
            DeviceOptionKind::Unavailable => {
                format!("{}{}", self.value, l10n.t("opt.unavailable"))
            }
        }
    }
}

/// Ordered device options plus the committed selection, which is always
/// the value of one of the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelect {
    role: DeviceRole,
    reported: Vec<String>,
    options: Vec<DeviceOption>,
    selected: String,
}

impl DeviceSelect {
    pub fn empty(role: DeviceRole) -> Self {
        merge_devices(role, &[], "")
    }

    pub fn role(&self) -> DeviceRole {
        self.role
    }

    pub fn options(&self) -> &[DeviceOption] {
        &self.options
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn selected_index(&self) -> usize {
        self.options
            .iter()
            .position(|o| o.value == self.selected)
            .unwrap_or_default()
    }

    /// Commit one of the offered values. Rejects anything else.
    pub fn select(&mut self, value: &str) -> bool {
        if self.options.iter().any(|o| o.value == value) {
            self.selected = value.to_owned();
            true
        } else {
            false
        }
    }

    /// Re-merge the last reported list against a new selection.
    pub fn reselect(&mut self, selected: &str) {
        *self = merge_devices(self.role, &self.reported, selected);
    }

    /// Merge a freshly reported list, keeping the current selection.
    pub fn refresh(&mut self, reported: &[String]) {
        *self = merge_devices(self.role, reported, &self.selected);
    }
}

/// Deduplicate `reported` in first-seen order (empty names dropped), put
/// an `Auto` entry first, and append an `Unavailable` entry for a non-empty
/// `selected` that is not reported.
pub fn merge_devices(role: DeviceRole, reported: &[String], selected: &str) -> DeviceSelect {
    let unique: IndexSet<&str> = reported
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect();

    let mut options = Vec::with_capacity(unique.len() + 2);
    options.push(DeviceOption {
        value: String::new(),
        kind: DeviceOptionKind::Auto,
    });
    options.extend(unique.iter().map(|name| DeviceOption {
        value: (*name).to_owned(),
        kind: DeviceOptionKind::Reported,
    }));
    if !selected.is_empty() && !unique.contains(selected) {
        options.push(DeviceOption {
            value: selected.to_owned(),
            kind: DeviceOptionKind::Unavailable,
        });
    }

    DeviceSelect {
        role,
        reported: unique.iter().map(|name| (*name).to_owned()).collect(),
        options,
        selected: selected.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::i18n::Language;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn values(select: &DeviceSelect) -> Vec<(&str, DeviceOptionKind)> {
        select
            .options()
            .iter()
            .map(|o| (o.value.as_str(), o.kind))
            .collect()
    }

    #[test]
    fn dedupes_in_first_seen_order() {
        let select = merge_devices(
            DeviceRole::Hotspot,
            &names(&["wlan1", "", "wlan0", "wlan1"]),
            "wlan0",
        );
        assert_eq!(
            values(&select),
            vec![
                ("", DeviceOptionKind::Auto),
                ("wlan1", DeviceOptionKind::Reported),
                ("wlan0", DeviceOptionKind::Reported),
            ]
        );
        assert_eq!(select.selected(), "wlan0");
    }

    #[test]
    fn keeps_exactly_one_unavailable_entry() {
        let mut select = merge_devices(DeviceRole::Uplink, &names(&["eth0"]), "wwan0");
        select.refresh(&names(&["eth0", "eth1"]));
        select.refresh(&names(&[]));
        let unavailable = select
            .options()
            .iter()
            .filter(|o| o.kind == DeviceOptionKind::Unavailable)
            .count();
        assert_eq!(unavailable, 1);
        assert_eq!(select.selected(), "wwan0");
        assert_eq!(select.selected_index(), 1);
    }

    #[test]
    fn labels_follow_language() {
        let select = merge_devices(DeviceRole::Uplink, &[], "usb0");
        let auto = &select.options()[0];
        let missing = &select.options()[1];
        assert_eq!(
            auto.label(DeviceRole::Uplink, Localizer::new(Language::En)),
            "Auto (default route)"
        );
        assert_eq!(
            missing.label(DeviceRole::Uplink, Localizer::new(Language::En)),
            "usb0 (unavailable)"
        );
        assert_eq!(
            auto.label(DeviceRole::Hotspot, Localizer::new(Language::Zh)),
            "自动选择"
        );
    }

    #[test]
    fn select_rejects_unknown_values() {
        let mut select = merge_devices(DeviceRole::Hotspot, &names(&["wlan0"]), "");
        assert!(select.select("wlan0"));
        assert!(!select.select("wlan9"));
        assert_eq!(select.selected(), "wlan0");
    }
}
