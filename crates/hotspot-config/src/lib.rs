//! Configuration for the hotspot console.
//!
//! Two files live in the platform config directory:
//!
//! - `config.toml`: where the backend is and how to talk to it. Loaded with
//!   figment (defaults, then the file, then `HOTSPOT_*` env vars).
//! - `settings.toml`: the UI choices that survive a restart (language and
//!   theme), read and written through [`FileSettingsStore`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use hotspot_api::TransportConfig;
use hotspot_core::{CoreError, Language, SettingsStore, StoredSettings, ThemeMode};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { .. } | ConfigError::Figment(_) => CoreError::Config {
                message: err.to_string(),
            },
            other => CoreError::Settings {
                message: other.to_string(),
            },
        }
    }
}

// ── App config ──────────────────────────────────────────────────────

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8080/cgi-bin/";

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding the `*.cgi` endpoints.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Status poller period.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Where the TUI writes its log. `None` uses the front end's default.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            log_file: None,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    5
}

impl Config {
    /// Parsed backend URL. Only `http` and `https` are accepted.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self
            .backend_url
            .trim()
            .parse()
            .map_err(|e: url::ParseError| ConfigError::Validation {
                field: "backend_url".into(),
                reason: format!("{e}: {}", self.backend_url),
            })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::Validation {
                field: "backend_url".into(),
                reason: format!("unsupported scheme '{other}'"),
            }),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(Duration::from_secs(self.timeout_secs.max(1)))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Platform config directory, falling back to `~/.config/hotspot-console`.
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "fn-apps", "hotspot-console").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("hotspot-console");
            p
        },
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load `config.toml` from the platform location plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` plus environment. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HOTSPOT_").only(&[
            "backend_url",
            "timeout_secs",
            "poll_interval_secs",
            "log_file",
        ]))
        .extract()?;
    config.backend_url()?;
    Ok(config)
}

// ── Persisted settings ──────────────────────────────────────────────

/// On-disk shape of `settings.toml`. Values are kept as strings so an
/// unknown language or theme degrades to the default instead of failing.
#[derive(Debug, Default, Deserialize, Serialize)]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

impl From<SettingsFile> for StoredSettings {
    fn from(file: SettingsFile) -> Self {
        Self {
            language: file
                .language
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(Language::from_code),
            theme: file
                .theme
                .as_deref()
                .map(ThemeMode::from_code)
                .unwrap_or_default(),
        }
    }
}

impl From<&StoredSettings> for SettingsFile {
    fn from(settings: &StoredSettings) -> Self {
        Self {
            language: settings.language.map(|l| l.code().to_owned()),
            theme: Some(settings.theme.to_string()),
        }
    }
}

/// `settings.toml` backed [`SettingsStore`].
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`settings_path()`].
    pub fn default_location() -> Self {
        Self::new(settings_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredSettings, ConfigError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(StoredSettings::default()),
            Err(e) => return Err(e.into()),
        };
        let file: SettingsFile = toml::from_str(&text)?;
        Ok(file.into())
    }

    fn write(&self, settings: &StoredSettings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(&SettingsFile::from(settings))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> StoredSettings {
        self.read().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable settings");
            StoredSettings::default()
        })
    }

    fn save(&self, settings: &StoredSettings) -> Result<(), CoreError> {
        self.write(settings)?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend_url = \"http://10.0.0.1/cgi-bin/\"\npoll_interval_secs = 2\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.backend_url, "http://10.0.0.1/cgi-bin/");
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn rejects_non_http_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "backend_url = \"ftp://10.0.0.1/\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "backend_url"));
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let config = Config {
            timeout_secs: 0,
            poll_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.transport().timeout, Duration::from_secs(1));
    }

    #[test]
    fn settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested").join("settings.toml"));
        assert_eq!(store.load(), StoredSettings::default());

        let settings = StoredSettings {
            language: Some(Language::En),
            theme: ThemeMode::Dark,
        };
        store.save(&settings).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("language = \"en\""));
        assert!(text.contains("theme = \"dark\""));
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn unknown_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "language = \"fr\"\ntheme = \"sepia\"\n").unwrap();

        let settings = FileSettingsStore::new(&path).load();
        assert_eq!(settings.language, Some(Language::Zh));
        assert_eq!(settings.theme, ThemeMode::System);
    }

    #[test]
    fn garbage_settings_load_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        assert_eq!(FileSettingsStore::new(&path).load(), StoredSettings::default());
    }
}
