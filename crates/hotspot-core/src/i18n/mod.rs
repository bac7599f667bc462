//! Localization tables and text resolution.
//!
//! One JSON table per language is embedded at compile time. Lookups go to
//! the active language, then to Chinese (the reference table), then fall
//! back to the key itself, so a missing entry is visible but never fatal.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

/// Supported UI languages.
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
pub enum Language {
    /// Simplified Chinese, the reference table.
    #[default]
    Zh,
    /// English.
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Resolve a stored language code. Unknown codes fall back to Chinese.
    pub fn from_code(code: &str) -> Self {
        code.trim().to_lowercase().parse().unwrap_or_default()
    }

    /// Pick a language from a platform locale such as `zh_CN.UTF-8` or
    /// `en-US`. Only Chinese locales map to Chinese.
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_lowercase().starts_with("zh") {
            Self::Zh
        } else {
            Self::En
        }
    }

    /// Initial language: the persisted setting wins, then the locale.
    pub fn initial(persisted: Option<&str>, locale: Option<&str>) -> Self {
        match (persisted.map(str::trim).filter(|s| !s.is_empty()), locale) {
            (Some(code), _) => Self::from_code(code),
            (None, Some(locale)) => Self::from_locale(locale),
            (None, None) => Self::default(),
        }
    }

    /// The other language, for a cycling switch.
    pub fn next(self) -> Self {
        match self {
            Self::Zh => Self::En,
            Self::En => Self::Zh,
        }
    }

    /// Key naming this language in the `lang.*` table entries.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Zh => "lang.zh",
            Self::En => "lang.en",
        }
    }
}

// ── Tables ───────────────────────────────────────────────────────────

type Table = HashMap<String, Value>;

static ZH_TABLE: LazyLock<Table> =
    LazyLock::new(|| serde_json::from_str(include_str!("zh.json")).unwrap_or_default());
static EN_TABLE: LazyLock<Table> =
    LazyLock::new(|| serde_json::from_str(include_str!("en.json")).unwrap_or_default());

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").ok());

fn table(language: Language) -> &'static Table {
    match language {
        Language::Zh => &ZH_TABLE,
        Language::En => &EN_TABLE,
    }
}

/// Text resolver bound to one language.
///
/// Cheap to copy; hold one per render pass rather than caching strings so
/// a language switch takes effect on the next draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Localizer {
    language: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(self) -> Language {
        self.language
    }

    fn lookup(self, key: &str) -> Option<&'static Value> {
        table(self.language)
            .get(key)
            .or_else(|| table(Language::Zh).get(key))
    }

    /// Resolve `key` with no substitutions.
    pub fn t(self, key: &str) -> String {
        self.text(key, &[])
    }

    /// Resolve `key` and substitute `{name}` placeholders from `vars`.
    /// A placeholder with no matching variable becomes empty.
    pub fn text(self, key: &str, vars: &[(&str, &str)]) -> String {
        let template = match self.lookup(key) {
            Some(Value::String(s)) => s.as_str(),
            Some(_) | None => return key.to_owned(),
        };
        match PLACEHOLDER.as_ref() {
            Some(re) => re
                .replace_all(template, |caps: &Captures<'_>| {
                    let name = caps.get(1).map_or("", |m| m.as_str());
                    vars.iter()
                        .find(|(k, _)| *k == name)
                        .map_or_else(String::new, |(_, v)| (*v).to_owned())
                })
                .into_owned(),
            None => template.to_owned(),
        }
    }

    /// Resolve a list-valued key such as `clients.cols`. Empty if the key is
    /// missing or not a list.
    pub fn list(self, key: &str) -> Vec<String> {
        match self.lookup(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tables_are_loaded() {
        assert!(ZH_TABLE.len() > 50);
        assert_eq!(ZH_TABLE.len(), EN_TABLE.len());
        for key in ZH_TABLE.keys() {
            assert!(EN_TABLE.contains_key(key), "missing English entry for {key}");
        }
    }

    #[test]
    fn lookup_falls_back_to_key() {
        let l10n = Localizer::new(Language::En);
        assert_eq!(l10n.t("btn.ok"), "OK");
        assert_eq!(l10n.t("no.such.key"), "no.such.key");
        // List-valued entries are not text.
        assert_eq!(l10n.t("clients.cols"), "clients.cols");
    }

    #[test]
    fn placeholders_substitute_or_vanish() {
        let l10n = Localizer::new(Language::En);
        assert_eq!(
            l10n.text("kick.confirm", &[("mac", "aa:bb:cc:dd:ee:ff"), ("ip", "\n10.0.0.2")]),
            "Kick this client?\naa:bb:cc:dd:ee:ff\n10.0.0.2"
        );
        assert_eq!(
            l10n.text("kick.confirm", &[("mac", "aa:bb:cc:dd:ee:ff")]),
            "Kick this client?\naa:bb:cc:dd:ee:ff"
        );
    }

    #[test]
    fn connection_name_is_wrapped_per_language() {
        let zh = Localizer::new(Language::Zh);
        let en = Localizer::new(Language::En);
        assert_eq!(zh.text("hotspot.conPart", &[("name", "Home")]), "（Home）");
        assert_eq!(en.text("hotspot.conPart", &[("name", "Home")]), " (Home)");
    }

    #[test]
    fn list_values() {
        let cols = Localizer::new(Language::En).list("clients.cols");
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0], "Hostname");
        assert!(Localizer::new(Language::En).list("btn.ok").is_empty());
    }

    #[test]
    fn initial_language_selection() {
        assert_eq!(Language::initial(Some("en"), Some("zh_CN.UTF-8")), Language::En);
        assert_eq!(Language::initial(Some("fr"), None), Language::Zh);
        assert_eq!(Language::initial(None, Some("zh_TW.UTF-8")), Language::Zh);
        assert_eq!(Language::initial(Some(""), Some("de_DE.UTF-8")), Language::En);
        assert_eq!(Language::initial(None, None), Language::Zh);
    }
}
