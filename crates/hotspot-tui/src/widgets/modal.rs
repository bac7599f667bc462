//! Overlay for the active modal.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use hotspot_core::{ModalButton, ModalKind, ModalView};

use crate::theme::Palette;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Box for the modal, centered in `area`. Clicks outside it count as a
/// backdrop click.
pub fn modal_area(area: Rect, modal: &ModalView) -> Rect {
    let width = 56u16.min(area.width.saturating_sub(4));
    let text_width = usize::from(width.saturating_sub(4)).max(1);
    let lines: usize = modal
        .message
        .lines()
        .map(|l| l.chars().count().div_ceil(text_width).max(1))
        .sum();
    // Borders, padding, button row.
    let chrome = if modal.has_actions() { 5 } else { 3 };
    let height = u16::try_from(lines + chrome)
        .unwrap_or(u16::MAX)
        .min(area.height.saturating_sub(2));

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

pub fn render(frame: &mut Frame, area: Rect, modal: &ModalView, palette: Palette, tick: usize) {
    let rect = modal_area(area, modal);
    frame.render_widget(Clear, rect);

    let title = match modal.kind {
        ModalKind::Progress => format!(" {} {} ", SPINNER[tick % SPINNER.len()], modal.title),
        _ => format!(" {} ", modal.title),
    };
    let block = Block::default()
        .title(title)
        .title_style(palette.title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(palette.border(true))
        .style(palette.base());
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let [body, buttons] = if modal.has_actions() {
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner)
    } else {
        [inner, Rect::default()]
    };

    frame.render_widget(
        Paragraph::new(modal.message.as_str())
            .style(palette.text())
            .wrap(Wrap { trim: false }),
        body,
    );

    if !modal.has_actions() {
        return;
    }
    let button = |text: &str, which: ModalButton| {
        let style = if modal.focused == Some(which) {
            palette.selected()
        } else {
            palette.text()
        };
        Span::styled(format!("[ {text} ]"), style)
    };
    let mut spans = Vec::new();
    if modal.has_cancel() {
        spans.push(button(&modal.cancel_text, ModalButton::Cancel));
        spans.push(Span::raw("  "));
    }
    spans.push(button(&modal.ok_text, ModalButton::Ok));

    let row = Rect {
        y: buttons.y + 1,
        height: 1,
        ..buttons
    };
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        row.intersection(buttons),
    );
}
