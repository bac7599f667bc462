//! Screen identifiers, navigable by number keys 1-3 or Tab.

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ScreenId {
    #[default]
    Config,
    Clients,
    Status,
}

impl ScreenId {
    pub const ALL: [ScreenId; 3] = [Self::Config, Self::Clients, Self::Status];

    pub fn number(self) -> u8 {
        match self {
            Self::Config => 1,
            Self::Clients => 2,
            Self::Status => 3,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    pub fn next(self) -> Self {
        match self {
            Self::Config => Self::Clients,
            Self::Clients => Self::Status,
            Self::Status => Self::Config,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Config => Self::Status,
            Self::Clients => Self::Config,
            Self::Status => Self::Clients,
        }
    }

    /// Translation key of the tab label.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Config => "section.config",
            Self::Clients => "section.clients",
            Self::Status => "section.status",
        }
    }
}
