//! Associated stations, with a kick action on the selected row.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use hotspot_core::{ClientRecord, Control, Localizer, SessionState};

use crate::action::Action;
use crate::component::Component;
use crate::theme::Palette;
use crate::widgets::bytes_fmt::{fmt_duration, fmt_signal, fmt_traffic};

const FALLBACK_COLUMNS: [&str; 7] = ["主机名", "MAC", "IP", "信号", "在线", "流量", "操作"];

/// Column headings from the active table, or the built-in set when the
/// table entry is missing or short.
fn column_names(l10n: Localizer) -> Vec<String> {
    let cols = l10n.list("clients.cols");
    if cols.len() >= FALLBACK_COLUMNS.len() {
        cols
    } else {
        FALLBACK_COLUMNS.iter().map(ToString::to_string).collect()
    }
}

/// Cell text for one client, in column order (without the action).
fn row_cells(client: &ClientRecord) -> [String; 6] {
    [
        client.hostname.clone(),
        client.mac.to_string(),
        client.ip.clone(),
        fmt_signal(client.signal_dbm),
        client.connected_seconds.map(fmt_duration).unwrap_or_default(),
        fmt_traffic(client.rx_bytes, client.tx_bytes),
    ]
}

pub struct ClientsScreen {
    state: Arc<SessionState>,
    // `render` takes `&self`; interior mutability keeps the table offset.
    table_state: std::cell::RefCell<TableState>,
    focused: bool,
}

impl ClientsScreen {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SessionState::default()),
            table_state: std::cell::RefCell::new(TableState::default().with_selected(0)),
            focused: false,
        }
    }

    fn selected(&self) -> Option<&ClientRecord> {
        let index = self.table_state.borrow().selected()?;
        self.state.clients.get(index)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.state.clients.len();
        let table = self.table_state.get_mut();
        if len == 0 {
            table.select(None);
            return;
        }
        let current = table.selected().unwrap_or(0);
        table.select(Some(current.saturating_add_signed(delta).min(len - 1)));
    }

    fn kick_enabled(&self, client: &ClientRecord) -> bool {
        client.can_kick() && !self.state.is_busy(&Control::Kick(client.mac.clone()))
    }
}

impl Component for ClientsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home | KeyCode::Char('g') => self.table_state.get_mut().select(Some(0)),
            KeyCode::End | KeyCode::Char('G') => {
                let last = self.state.clients.len().saturating_sub(1);
                self.table_state.get_mut().select(Some(last));
            }
            KeyCode::Enter | KeyCode::Delete | KeyCode::Char('x') => {
                return Ok(self
                    .selected()
                    .filter(|c| self.kick_enabled(c))
                    .map(|c| Action::Kick(c.mac.to_string())));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::StateUpdated(state) = action {
            self.state = Arc::clone(state);
            // Keep the selection inside the (possibly shorter) list.
            self.move_selection(0);
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let l10n = self.state.localizer();
        let clients = &self.state.clients;
        let block = Block::default()
            .title(format!(" {} ({}) ", l10n.t("section.clients"), clients.len()))
            .title_style(palette.title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(palette.border(self.focused));

        if clients.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::styled(l10n.t("clients.empty"), palette.muted())),
                inner,
            );
            return;
        }

        let header = Row::new(column_names(l10n).into_iter().map(Cell::from))
            .style(palette.table_header())
            .height(1);
        let kick_label = l10n.t("btn.kick");
        let rows = clients.iter().map(|client| {
            let action_style = if self.kick_enabled(client) {
                palette.text()
            } else {
                palette.muted()
            };
            let mut cells: Vec<Cell> = row_cells(client).into_iter().map(Cell::from).collect();
            cells.push(Cell::from(format!("[{kick_label}]")).style(action_style));
            Row::new(cells).style(palette.text())
        });

        let widths = [
            Constraint::Fill(2),
            Constraint::Length(17),
            Constraint::Length(15),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Fill(2),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(palette.selected())
            .highlight_symbol("› ");

        let mut table_state = self.table_state.borrow_mut();
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
