//! Raw backend status, pretty-printed and scrollable.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use hotspot_core::SessionState;

use crate::action::Action;
use crate::component::Component;
use crate::theme::Palette;

pub struct StatusScreen {
    state: Arc<SessionState>,
    scroll: u16,
    focused: bool,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SessionState::default()),
            scroll: 0,
            focused: false,
        }
    }

    fn line_count(&self) -> u16 {
        u16::try_from(self.state.status.pretty().lines().count()).unwrap_or(u16::MAX)
    }
}

impl Component for StatusScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let max = self.line_count().saturating_sub(1);
        self.scroll = match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll.saturating_add(1).min(max),
            KeyCode::PageUp => self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll.saturating_add(10).min(max),
            KeyCode::Home | KeyCode::Char('g') => 0,
            _ => return Ok(None),
        };
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StateUpdated(state) = action {
            self.state = Arc::clone(state);
            self.scroll = self.scroll.min(self.line_count().saturating_sub(1));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let l10n = self.state.localizer();
        let block = Block::default()
            .title(format!(" {} ", l10n.t("section.status")))
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border(self.focused));

        let paragraph = Paragraph::new(self.state.status.pretty())
            .style(palette.text())
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
