// ── Radio band ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 2.4GHz channels offered when the backend reports no capability.
const FALLBACK_BG: [u16; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// 5GHz channels offered when the backend reports no capability
/// (DFS ranges included).
const FALLBACK_A: [u16; 25] = [
    36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
    149, 153, 157, 161, 165,
];

/// Radio band, serialized with the backend's codes.
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
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Band {
    /// 2.4GHz.
    #[default]
    Bg,
    /// 5GHz.
    A,
}

impl Band {
    /// Parse a backend band code. Anything unrecognized is 2.4GHz.
    pub fn from_code(code: &str) -> Self {
        code.trim().parse().unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Bg => "bg",
            Self::A => "a",
        }
    }

    /// Channel selected when nothing better is known.
    pub fn default_channel(self) -> u16 {
        match self {
            Self::Bg => 6,
            Self::A => 36,
        }
    }

    /// Static channel table used when the backend capability is empty or
    /// unknown.
    pub fn fallback_channels(self) -> &'static [u16] {
        match self {
            Self::Bg => &FALLBACK_BG,
            Self::A => &FALLBACK_A,
        }
    }

    /// Human-readable frequency label.
    pub fn frequency_label(self) -> &'static str {
        match self {
            Self::Bg => "2.4GHz",
            Self::A => "5GHz",
        }
    }
}
