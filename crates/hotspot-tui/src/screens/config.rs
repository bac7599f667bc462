//! Configuration form: device selectors, addressing, and Wi-Fi parameters.
//!
//! Up/Down move between fields. Select fields cycle with Left/Right (or
//! Enter); text fields enter edit mode with Enter and leave it with Enter
//! or Esc. While editing, every printable key goes into the field.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use hotspot_core::{Band, DeviceRole, DeviceSelect, Localizer, SessionState, TextField};

use crate::action::Action;
use crate::component::Component;
use crate::theme::Palette;

/// Form rows in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Device(DeviceRole),
    Text(TextField),
    Band,
    Channel,
}

const FIELDS: [Field; 8] = [
    Field::Device(DeviceRole::Hotspot),
    Field::Device(DeviceRole::Uplink),
    Field::Text(TextField::IpCidr),
    Field::Text(TextField::AllowPorts),
    Field::Text(TextField::Ssid),
    Field::Text(TextField::Password),
    Field::Band,
    Field::Channel,
];

impl Field {
    /// Stable page-focus key.
    fn key(self) -> &'static str {
        match self {
            Self::Device(DeviceRole::Hotspot) => "iface",
            Self::Device(DeviceRole::Uplink) => "uplink",
            Self::Text(TextField::IpCidr) => "ipCidr",
            Self::Text(TextField::AllowPorts) => "allowPorts",
            Self::Text(TextField::Ssid) => "ssid",
            Self::Text(TextField::Password) => "password",
            Self::Band => "band",
            Self::Channel => "channel",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            Self::Device(DeviceRole::Hotspot) => "label.iface",
            Self::Device(DeviceRole::Uplink) => "label.uplink",
            Self::Text(field) => field.label_key(),
            Self::Band => "label.band",
            Self::Channel => "label.channel",
        }
    }

    /// Heading shown above the first row of each group.
    fn section_key(index: usize) -> Option<&'static str> {
        match index {
            0 => Some("section.net"),
            2 => Some("section.config"),
            4 => Some("section.wifi"),
            _ => None,
        }
    }
}

pub struct ConfigScreen {
    state: Arc<SessionState>,
    cursor: usize,
    editing: bool,
    focused: bool,
}

impl ConfigScreen {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SessionState::default()),
            cursor: 0,
            editing: false,
            focused: false,
        }
    }

    fn field(&self) -> Field {
        FIELDS.get(self.cursor).copied().unwrap_or(Field::Band)
    }

    fn move_cursor(&mut self, delta: isize) -> Option<Action> {
        let next = self.cursor.saturating_add_signed(delta).min(FIELDS.len() - 1);
        if next == self.cursor {
            return None;
        }
        self.cursor = next;
        Some(Action::PageFocus(self.field().key().to_owned()))
    }

    /// Action that moves the focused select field by `step`.
    fn cycle(&self, step: isize) -> Option<Action> {
        let form = &self.state.form;
        match self.field() {
            Field::Device(role) => {
                let select: &DeviceSelect = match role {
                    DeviceRole::Hotspot => form.iface(),
                    DeviceRole::Uplink => form.uplink(),
                };
                let options = select.options();
                let next = wrap(select.selected_index(), step, options.len())?;
                let value = options.get(next)?.value.clone();
                Some(Action::SelectDevice(role, value))
            }
            Field::Band => {
                let next = match form.band() {
                    Band::Bg if form.band5_available => Band::A,
                    Band::Bg => return None,
                    Band::A => Band::Bg,
                };
                Some(Action::SelectBand(next))
            }
            Field::Channel => {
                let channels = form.channel();
                let next = wrap(channels.selected_index(), step, channels.options().len())?;
                channels.options().get(next).copied().map(Action::SelectChannel)
            }
            Field::Text(_) => None,
        }
    }

    fn value_line(&self, field: Field, l10n: Localizer, palette: Palette) -> Vec<Span<'static>> {
        let form = &self.state.form;
        match field {
            Field::Device(role) => {
                let select = match role {
                    DeviceRole::Hotspot => form.iface(),
                    DeviceRole::Uplink => form.uplink(),
                };
                let label = select
                    .options()
                    .get(select.selected_index())
                    .map(|o| o.label(role, l10n))
                    .unwrap_or_default();
                vec![Span::styled(format!("‹ {label} ›"), palette.text())]
            }
            Field::Text(text_field) => {
                let value = form.text(text_field);
                let shown = if text_field == TextField::Password && !self.state.password_visible {
                    "•".repeat(value.chars().count())
                } else {
                    value.to_owned()
                };
                let mut spans = Vec::new();
                if shown.is_empty() {
                    if let Some(key) = text_field.placeholder_key() {
                        spans.push(Span::styled(l10n.t(key), palette.muted()));
                    }
                } else {
                    spans.push(Span::styled(shown, palette.text()));
                }
                if self.editing && self.field() == field {
                    spans.push(Span::styled("▏", palette.selected()));
                }
                if text_field == TextField::Password {
                    let key = if self.state.password_visible {
                        "pw.hide"
                    } else {
                        "pw.show"
                    };
                    spans.push(Span::styled(format!("  (p {})", l10n.t(key)), palette.muted()));
                }
                spans
            }
            Field::Band => [Band::Bg, Band::A]
                .into_iter()
                .flat_map(|band| {
                    let style = if band == form.band() {
                        palette.selected()
                    } else if band == Band::A && !form.band5_available {
                        palette.muted().add_modifier(Modifier::CROSSED_OUT)
                    } else {
                        palette.text()
                    };
                    [
                        Span::styled(format!(" {} ", band.frequency_label()), style),
                        Span::raw(" "),
                    ]
                })
                .collect(),
            Field::Channel => vec![Span::styled(
                format!("‹ {} ›", form.channel().selected()),
                palette.text(),
            )],
        }
    }
}

fn wrap(current: usize, step: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = isize::try_from(len).ok()?;
    let current = isize::try_from(current).ok()?;
    usize::try_from((current + step).rem_euclid(len)).ok()
}

impl Component for ConfigScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing {
            let Field::Text(field) = self.field() else {
                self.editing = false;
                return Ok(None);
            };
            return Ok(match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    self.editing = false;
                    None
                }
                KeyCode::Backspace => Some(Action::PopChar(field)),
                KeyCode::Char(c) => Some(Action::PushChar(field, c)),
                _ => None,
            });
        }

        Ok(match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Left => self.cycle(-1),
            KeyCode::Right => self.cycle(1),
            KeyCode::Enter => match self.field() {
                Field::Text(_) => {
                    self.editing = true;
                    None
                }
                _ => self.cycle(1),
            },
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::StateUpdated(state) => self.state = Arc::clone(state),
            // Focus comes back to the field that held it before the modal.
            Action::DialogUpdated(view) if view.modal.is_none() => {
                if let Some(index) = view
                    .page_focus
                    .as_deref()
                    .and_then(|key| FIELDS.iter().position(|f| f.key() == key))
                {
                    self.cursor = index;
                }
            }
            Action::DialogUpdated(_) => self.editing = false,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let l10n = self.state.localizer();
        let mut title = format!(" {} ", l10n.t("section.config"));
        if self.state.form.is_dirty() {
            title.push_str("* ");
        }
        let block = Block::default()
            .title(title)
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border(self.focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label_width = FIELDS
            .iter()
            .map(|f| l10n.t(f.label_key()).chars().count())
            .max()
            .unwrap_or(0)
            .min(24);

        let mut lines = Vec::new();
        for (index, field) in FIELDS.iter().copied().enumerate() {
            if let Some(section) = Field::section_key(index) {
                if index > 0 {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(l10n.t(section), palette.title())));
            }
            let active = index == self.cursor;
            let marker = if active { "›" } else { " " };
            let label_style = if active { palette.selected() } else { palette.text() };
            let mut spans = vec![
                Span::styled(format!("{marker} "), palette.selected()),
                Span::styled(
                    format!("{:<label_width$}", l10n.t(field.label_key())),
                    label_style,
                ),
                Span::raw("  "),
            ];
            spans.extend(self.value_line(field, l10n, palette));
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.editing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(screen: &mut ConfigScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .ok()
            .flatten()
    }

    #[test]
    fn wrap_cycles_both_ways() {
        assert_eq!(wrap(0, -1, 3), Some(2));
        assert_eq!(wrap(2, 1, 3), Some(0));
        assert_eq!(wrap(0, 1, 0), None);
    }

    #[test]
    fn editing_captures_letters() {
        let mut screen = ConfigScreen::new();
        // Down to the SSID row.
        for _ in 0..4 {
            press(&mut screen, KeyCode::Down);
        }
        assert!(!screen.captures_input());
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert!(screen.captures_input());
        assert!(matches!(
            press(&mut screen, KeyCode::Char('q')),
            Some(Action::PushChar(TextField::Ssid, 'q'))
        ));
        press(&mut screen, KeyCode::Esc);
        assert!(!screen.captures_input());
    }

    #[test]
    fn unavailable_5ghz_is_not_offered() {
        let mut screen = ConfigScreen::new();
        let mut state = SessionState::default();
        state.form.band5_available = false;
        screen.state = Arc::new(state);
        screen.cursor = 6;
        assert!(screen.cycle(1).is_none());
    }

    #[test]
    fn cursor_moves_report_page_focus() {
        let mut screen = ConfigScreen::new();
        assert!(press(&mut screen, KeyCode::Up).is_none());
        assert!(matches!(
            press(&mut screen, KeyCode::Down),
            Some(Action::PageFocus(key)) if key == "uplink"
        ));
    }
}
