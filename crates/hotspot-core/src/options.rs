// ── Channel option synchronization ──
//
// Keeps the channel list consistent with the selected band and the radio's
// regulatory capability. Whatever the inputs, the selected channel ends up
// inside the derived list.

use tracing::debug;

use crate::form::FormState;
use crate::model::{Band, ChannelCapability};

/// Channel options for one band plus the committed selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSelect {
    options: Vec<u16>,
    selected: u16,
}

impl ChannelSelect {
    pub fn options(&self) -> &[u16] {
        &self.options
    }

    pub fn selected(&self) -> u16 {
        self.selected
    }

    pub fn selected_index(&self) -> usize {
        self.options
            .iter()
            .position(|c| *c == self.selected)
            .unwrap_or_default()
    }

    /// Select `channel` if it is one of the options.
    pub fn select(&mut self, channel: u16) -> bool {
        if self.options.contains(&channel) {
            self.selected = channel;
            true
        } else {
            false
        }
    }
}

impl Default for ChannelSelect {
    fn default() -> Self {
        resync(Band::Bg, 0, true, &ChannelCapability::default())
    }
}

/// Channels offered for `band`: the backend's list when it is non-empty,
/// otherwise the static table. Never empty.
pub fn derive_channels(band: Band, capability: &ChannelCapability) -> Vec<u16> {
    match capability.for_band(band) {
        Some(channels) if !channels.is_empty() => channels.to_vec(),
        _ => band.fallback_channels().to_vec(),
    }
}

/// Rebuild the channel options for `band`, keeping `preferred` if it is
/// still offered. `preferred == 0` means no preference.
pub fn resync(
    band: Band,
    preferred: u16,
    force_default: bool,
    capability: &ChannelCapability,
) -> ChannelSelect {
    let options = derive_channels(band, capability);
    let first = options.first().copied().unwrap_or_else(|| band.default_channel());

    let selected = if preferred != 0 && options.contains(&preferred) {
        preferred
    } else if force_default || preferred == 0 {
        let default = band.default_channel();
        if options.contains(&default) { default } else { first }
    } else {
        first
    };

    ChannelSelect { options, selected }
}

/// Disable 5GHz when the capability positively reports no channels.
///
/// If the form is on 5GHz at that moment it is moved to 2.4GHz, its
/// channel re-synchronized, and marked dirty. Returns `true` exactly when
/// that correction happened so the caller can show `msg.no5g` once.
pub fn update_band_availability(form: &mut FormState, capability: &ChannelCapability) -> bool {
    let available = capability.five_ghz_available();
    form.band5_available = available;

    if available || form.band() != Band::A {
        return false;
    }

    debug!("5GHz unavailable under current regulatory domain, switching to 2.4GHz");
    form.set_band_unchecked(Band::Bg, capability);
    form.mark_dirty();
    true
}

/// Loose sanity check on a channel string for a band code.
///
/// `bg` accepts 1-14, `a` accepts 34 and above, any other band accepts any
/// number. Non-numeric input is always invalid.
pub fn is_channel_valid_for_band(channel: &str, band: &str) -> bool {
    let Ok(n) = channel.trim().parse::<i64>() else {
        return false;
    };
    match band {
        "bg" => (1..=14).contains(&n),
        "a" => n >= 34,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn cap(bg: Option<Vec<u16>>, a: Option<Vec<u16>>) -> ChannelCapability {
        ChannelCapability { bg, a }
    }

    #[test]
    fn derived_channels_are_never_empty() {
        for band in [Band::Bg, Band::A] {
            for capability in [
                cap(None, None),
                cap(Some(vec![]), Some(vec![])),
                cap(Some(vec![1]), Some(vec![149])),
            ] {
                assert!(!derive_channels(band, &capability).is_empty());
            }
        }
        assert_eq!(derive_channels(Band::Bg, &cap(None, None)).len(), 13);
        assert_eq!(derive_channels(Band::A, &cap(None, Some(vec![]))).len(), 25);
        assert_eq!(derive_channels(Band::Bg, &cap(Some(vec![1, 6, 11]), None)), vec![1, 6, 11]);
    }

    #[test]
    fn resync_keeps_preferred_when_offered() {
        let capability = cap(Some(vec![1, 6, 11]), None);
        assert_eq!(resync(Band::Bg, 11, true, &capability).selected(), 11);
    }

    #[test]
    fn resync_falls_back_to_band_default() {
        let capability = cap(Some(vec![1, 6, 11]), None);
        assert_eq!(resync(Band::Bg, 3, true, &capability).selected(), 6);
        assert_eq!(resync(Band::Bg, 0, false, &capability).selected(), 6);
        assert_eq!(resync(Band::A, 6, true, &capability).selected(), 36);
    }

    #[test]
    fn resync_uses_first_channel_otherwise() {
        let capability = cap(Some(vec![1, 6, 11]), Some(vec![149, 153]));
        assert_eq!(resync(Band::Bg, 3, false, &capability).selected(), 1);
        // The band default is not offered, so the first channel wins.
        assert_eq!(resync(Band::A, 0, true, &capability).selected(), 149);
    }

    #[test]
    fn resync_result_is_always_in_set() {
        let capabilities = [
            cap(None, None),
            cap(Some(vec![11, 12]), Some(vec![100])),
            cap(Some(vec![]), Some(vec![36])),
        ];
        for capability in &capabilities {
            for band in [Band::Bg, Band::A] {
                for preferred in [0, 1, 6, 36, 100, 200] {
                    for force in [false, true] {
                        let select = resync(band, preferred, force, capability);
                        assert!(select.options().contains(&select.selected()));
                    }
                }
            }
        }
    }

    #[test]
    fn channel_validity() {
        assert!(is_channel_valid_for_band("6", "bg"));
        assert!(is_channel_valid_for_band("14", "bg"));
        assert!(!is_channel_valid_for_band("15", "bg"));
        assert!(!is_channel_valid_for_band("0", "bg"));
        assert!(is_channel_valid_for_band("36", "a"));
        assert!(!is_channel_valid_for_band("33", "a"));
        assert!(!is_channel_valid_for_band("auto", "a"));
        assert!(is_channel_valid_for_band("7", "ax"));
        assert!(!is_channel_valid_for_band("", "ax"));
    }
}
