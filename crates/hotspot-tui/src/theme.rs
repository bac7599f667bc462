//! Light and dark palettes plus the semantic styles built from them.

use ratatui::style::{Color, Modifier, Style};

use hotspot_core::{ThemeMode, prefers_dark};

// ── Dark palette ──────────────────────────────────────────────────────

const DARK_ACCENT: Color = Color::Rgb(225, 53, 255); // #e135ff
const DARK_TITLE: Color = Color::Rgb(128, 255, 234); // #80ffea
const DARK_TEXT: Color = Color::Rgb(189, 193, 207); // #bdc1cf
const DARK_BORDER: Color = Color::Rgb(98, 114, 164); // #6272a4
const DARK_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
const DARK_SURFACE: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Light palette ─────────────────────────────────────────────────────

const LIGHT_ACCENT: Color = Color::Rgb(124, 58, 237); // #7c3aed
const LIGHT_TITLE: Color = Color::Rgb(14, 116, 144); // #0e7490
const LIGHT_TEXT: Color = Color::Rgb(31, 41, 55); // #1f2937
const LIGHT_BORDER: Color = Color::Rgb(156, 163, 175); // #9ca3af
const LIGHT_HIGHLIGHT: Color = Color::Rgb(237, 233, 254); // #ede9fe
const LIGHT_SURFACE: Color = Color::Rgb(249, 250, 251); // #f9fafb

// ── Status colors (shared) ────────────────────────────────────────────

const SUCCESS: Color = Color::Rgb(34, 197, 94); // #22c55e
const WARNING: Color = Color::Rgb(234, 179, 8); // #eab308

/// Dark preference as the terminal reports it. Terminals have no change
/// notification, so callers re-read this when the theme returns to
/// `system`.
pub fn terminal_prefers_dark() -> bool {
    prefers_dark(
        std::env::var("HOTSPOT_PREFERS_DARK").ok().as_deref(),
        std::env::var("COLORFGBG").ok().as_deref(),
    )
}

/// Resolved colors for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub title: Color,
    pub text: Color,
    pub border: Color,
    pub highlight: Color,
    pub surface: Color,
}

impl Palette {
    pub const DARK: Self = Self {
        accent: DARK_ACCENT,
        title: DARK_TITLE,
        text: DARK_TEXT,
        border: DARK_BORDER,
        highlight: DARK_HIGHLIGHT,
        surface: DARK_SURFACE,
    };

    pub const LIGHT: Self = Self {
        accent: LIGHT_ACCENT,
        title: LIGHT_TITLE,
        text: LIGHT_TEXT,
        border: LIGHT_BORDER,
        highlight: LIGHT_HIGHLIGHT,
        surface: LIGHT_SURFACE,
    };

    /// Palette for a theme mode given the platform dark preference.
    pub fn resolve(mode: ThemeMode, prefers_dark: bool) -> Self {
        if mode.is_dark(prefers_dark) {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    pub fn base(self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn title(self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    pub fn border(self, focused: bool) -> Style {
        Style::default().fg(if focused { self.accent } else { self.border })
    }

    pub fn text(self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected(self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_header(self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn key_hint(self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn tab(self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
        } else {
            self.text()
        }
    }

    /// Running with internet, running without, or stopped.
    pub fn hotspot(self, running: bool, internet_ok: Option<bool>) -> Style {
        let color = match (running, internet_ok) {
            (false, _) => self.border,
            (true, Some(false)) => WARNING,
            (true, _) => SUCCESS,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_modes_ignore_platform_preference() {
        assert_eq!(Palette::resolve(ThemeMode::Light, true), Palette::LIGHT);
        assert_eq!(Palette::resolve(ThemeMode::Dark, false), Palette::DARK);
        assert_eq!(Palette::resolve(ThemeMode::System, true), Palette::DARK);
        assert_eq!(Palette::resolve(ThemeMode::System, false), Palette::LIGHT);
    }
}
