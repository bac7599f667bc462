// ── Persisted UI settings ──
//
// Language and theme are the only state that survives a restart. The
// engine only sees the `SettingsStore` trait; `hotspot-config` provides the
// file-backed implementation.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CoreError;
use crate::i18n::Language;

/// Theme preference as chosen by the user.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    /// Follow the platform dark-mode preference.
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse a stored value. Anything unknown follows the system.
    pub fn from_code(code: &str) -> Self {
        code.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Whether the dark palette applies, given the platform preference.
    pub fn is_dark(self, prefers_dark: bool) -> bool {
        match self {
            Self::System => prefers_dark,
            Self::Light => false,
            Self::Dark => true,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::System => Self::Light,
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            Self::System => "theme.system",
            Self::Light => "theme.light",
            Self::Dark => "theme.dark",
        }
    }
}

/// Platform dark preference for a terminal.
///
/// `override_flag` (`HOTSPOT_PREFERS_DARK`) wins when it is a recognizable
/// boolean. Otherwise the `COLORFGBG` convention (`fg;bg`) is consulted:
/// background colors 0-6 and 8 are dark.
pub fn prefers_dark(override_flag: Option<&str>, colorfgbg: Option<&str>) -> bool {
    if let Some(flag) = override_flag {
        match flag.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => return true,
            "0" | "false" | "no" | "off" => return false,
            _ => {}
        }
    }
    colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .is_some_and(|bg| bg <= 6 || bg == 8)
}

/// Values persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// `None` until the user picks a language.
    pub language: Option<Language>,
    #[serde(default)]
    pub theme: ThemeMode,
}

/// Small key-value persistence for UI settings.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> StoredSettings;
    fn save(&self, settings: &StoredSettings) -> Result<(), CoreError>;
}

/// In-memory store for tests and for running without a config directory.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: Mutex<StoredSettings>,
}

impl MemorySettings {
    pub fn new(initial: StoredSettings) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> StoredSettings {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, settings: &StoredSettings) -> Result<(), CoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_resolution() {
        assert!(ThemeMode::System.is_dark(true));
        assert!(!ThemeMode::System.is_dark(false));
        assert!(ThemeMode::Dark.is_dark(false));
        assert!(!ThemeMode::Light.is_dark(true));
        assert_eq!(ThemeMode::from_code("DARK"), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_code("sepia"), ThemeMode::System);
    }

    #[test]
    fn dark_preference_detection() {
        assert!(prefers_dark(None, Some("15;0")));
        assert!(!prefers_dark(None, Some("0;15")));
        assert!(prefers_dark(None, Some("15;default;8")));
        assert!(!prefers_dark(None, None));
        assert!(!prefers_dark(Some("0"), Some("15;0")));
        assert!(prefers_dark(Some("true"), None));
        assert!(prefers_dark(Some("maybe"), Some("7;0")));
    }
}
