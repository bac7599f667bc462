//! Application core: event loop, screen management, action dispatch.
//!
//! All text is resolved from the current [`SessionState`] at draw time, so a
//! language switch shows up on the next frame without any re-rendering
//! bookkeeping.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hotspot_core::{ActionOutcome, Control, DialogView, Session, SessionState, ThemeMode};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme::Palette;
use crate::tui::Tui;
use crate::widgets::modal;

const RENDER_RATE: Duration = Duration::from_millis(50);

pub struct App {
    session: Session,
    /// Platform dark preference, used when the theme follows the system.
    prefers_dark: bool,
    detect_dark: fn() -> bool,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    state: Arc<SessionState>,
    dialog: Arc<DialogView>,
    area: Rect,
    /// Render counter driving the progress spinner.
    frame_count: usize,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(session: Session, detect_dark: fn() -> bool) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let state = Arc::new(session.snapshot());
        let dialog = Arc::new(session.dialog().view());
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();
        if let Some(screen) = screens.get_mut(&ScreenId::default()) {
            screen.set_focused(true);
        }

        Self {
            session,
            prefers_dark: detect_dark(),
            detect_dark,
            active_screen: ScreenId::default(),
            screens,
            running: true,
            state,
            dialog,
            area: Rect::default(),
            frame_count: 0,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.area = tui.area()?;
        self.session.dialog().attach();

        let cancel = CancellationToken::new();
        let bridge = spawn_data_bridge(&self.session, self.action_tx.clone(), cancel.clone());
        let poller = self.session.spawn_poller(cancel.clone());
        let session = self.session.clone();
        tokio::spawn(async move {
            let _ = session.initial_sync().await;
        });

        let mut events = EventReader::new(RENDER_RATE);
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if matches!(action, Action::Render) {
                    self.frame_count = self.frame_count.wrapping_add(1);
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Resolve anything still waiting on a modal, then hand prompts back
        // to the line-mode fallback.
        cancel.cancel();
        events.stop();
        self.session.dialog().close();
        self.session.dialog().detach();
        tui.exit();
        let _ = tokio::join!(poller, bridge);
        info!("event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // An open modal owns the keyboard.
        if self.dialog.modal.is_some() {
            let dialog = self.session.dialog();
            match key.code {
                KeyCode::Esc => dialog.escape(),
                KeyCode::Enter => dialog.enter(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                    dialog.focus_next()
                }
                _ => false,
            };
            return Ok(None);
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());
        if !capturing {
            let global = match (key.modifiers, key.code) {
                (_, KeyCode::Tab) => Some(Action::SwitchScreen(self.active_screen.next())),
                (_, KeyCode::BackTab) => Some(Action::SwitchScreen(self.active_screen.prev())),
                (KeyModifiers::NONE, KeyCode::Char(c)) => match c {
                    'q' => Some(Action::Quit),
                    's' => Some(Action::Save),
                    't' => Some(Action::ToggleHotspot),
                    'p' => Some(Action::TogglePassword),
                    'l' => Some(Action::CycleLanguage),
                    'm' => Some(Action::CycleTheme),
                    '1'..='9' => c
                        .to_digit(10)
                        .and_then(|n| u8::try_from(n).ok())
                        .and_then(ScreenId::from_number)
                        .map(Action::SwitchScreen),
                    _ => None,
                },
                _ => None,
            };
            if global.is_some() {
                return Ok(global);
            }
        }

        match self.screens.get_mut(&self.active_screen) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    /// A click outside the modal box is a backdrop click.
    fn handle_mouse_event(&self, mouse: MouseEvent) {
        let Some(view) = self.dialog.modal.as_ref() else {
            return;
        };
        let rect = modal::modal_area(self.area, view);
        if !rect.contains(Position::new(mouse.column, mouse.row)) {
            self.session.dialog().backdrop_click();
        }
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render => {}
            Action::Resize(w, h) => self.area = Rect::new(0, 0, *w, *h),
            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::StateUpdated(state) => {
                self.state = Arc::clone(state);
                self.broadcast(action)?;
            }
            Action::DialogUpdated(view) => {
                self.dialog = Arc::clone(view);
                self.broadcast(action)?;
            }

            Action::PushChar(field, c) => self.session.edit(|form| form.push_char(*field, *c)),
            Action::PopChar(field) => self.session.edit(|form| form.pop_char(*field)),
            Action::SelectDevice(role, value) => {
                self.session.select_device(*role, value);
            }
            Action::SelectBand(band) => {
                self.session.select_band(*band);
            }
            Action::SelectChannel(channel) => {
                self.session.select_channel(*channel);
            }
            Action::PageFocus(key) => self.session.dialog().set_page_focus(Some(key.clone())),
            Action::TogglePassword => {
                self.session.toggle_password_visible();
            }

            Action::Save => {
                if !self.state.is_busy(&Control::Save) {
                    self.spawn_action("save", |s| async move { s.save().await });
                }
            }
            Action::ToggleHotspot => {
                if !self.state.is_busy(&Control::Toggle) {
                    self.spawn_action("toggle", |s| async move { s.toggle_hotspot().await });
                }
            }
            Action::Kick(mac) => {
                let mac = mac.clone();
                self.spawn_action("kick", |s| async move { s.kick_client(&mac).await });
            }

            Action::CycleLanguage => {
                let language = self.state.language.next();
                let session = self.session.clone();
                tokio::spawn(async move {
                    if let Err(e) = session.set_language(language).await {
                        warn!(error = %e, "language switch incomplete");
                    }
                });
            }
            Action::CycleTheme => {
                let theme = self.state.theme.next();
                if theme == ThemeMode::System {
                    self.prefers_dark = (self.detect_dark)();
                }
                self.session.set_theme(theme);
            }
        }
        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!(from = %self.active_screen, to = %target, "switching screen");
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    /// Data updates go to every screen so inactive tabs stay current.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn spawn_action<F, Fut>(&self, name: &'static str, run: F)
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = ActionOutcome> + Send + 'static,
    {
        let task = run(self.session.clone());
        tokio::spawn(async move {
            let outcome = task.await;
            debug!(action = name, ?outcome, "action task finished");
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn palette(&self) -> Palette {
        Palette::resolve(self.state.theme, self.prefers_dark)
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();
        frame.render_widget(Block::default().style(palette.base()), area);

        let [header, tabs, content, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header, palette);
        self.render_tabs(frame, tabs, palette);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content, palette);
        }
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(" {}", self.state.localizer().t("hint.keys")),
                palette.key_hint(),
            )),
            hints,
        );

        if let Some(view) = self.dialog.modal.as_ref() {
            modal::render(frame, area, view, palette, self.frame_count);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let state = &self.state;
        let l10n = state.localizer();
        let status = &state.status;

        let toggle_style = if state.is_busy(&Control::Toggle) {
            palette.muted()
        } else {
            palette.hotspot(status.running, status.internet_ok)
        };
        let save_style = if state.is_busy(&Control::Save) {
            palette.muted()
        } else {
            palette.text()
        };
        let mut left = vec![
            Span::styled(format!(" {} ", l10n.t("app.title")), palette.title()),
            Span::styled(format!(" {} ", state.toggle_label()), toggle_style),
            Span::styled(format!(" [{}] ", l10n.t("btn.save")), save_style),
        ];
        if !state.synced {
            left.push(Span::styled(" …", palette.muted()));
        }

        let right = Line::from(vec![
            Span::styled(format!("{}: ", l10n.t("aria.langSelect")), palette.muted()),
            Span::styled(l10n.t(state.language.label_key()), palette.text()),
            Span::styled(format!("  {}: ", l10n.t("aria.themeSelect")), palette.muted()),
            Span::styled(format!("{} ", l10n.t(state.theme.label_key())), palette.text()),
        ])
        .right_aligned();

        frame.render_widget(Paragraph::new(Line::from(left)), area);
        frame.render_widget(Paragraph::new(right), area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, palette: Palette) {
        let l10n = self.state.localizer();
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                Line::styled(
                    format!(" {} {} ", id.number(), l10n.t(id.label_key())),
                    palette.tab(id == self.active_screen),
                )
            })
            .collect();
        let selected = ScreenId::ALL
            .iter()
            .position(|&s| s == self.active_screen)
            .unwrap_or(0);
        frame.render_widget(
            Tabs::new(titles)
                .divider(Span::styled("│", palette.key_hint()))
                .select(selected),
            area,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use hotspot_api::{HotspotClient, TransportConfig};
    use hotspot_core::{DialogOrchestrator, MemorySettings, SessionOptions};

    use super::*;

    static TERMINAL_DARK: AtomicBool = AtomicBool::new(false);

    fn terminal_dark() -> bool {
        TERMINAL_DARK.load(Ordering::SeqCst)
    }

    fn session(theme: ThemeMode) -> Session {
        let client = HotspotClient::new(
            "http://127.0.0.1:9/cgi-bin/".parse().unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        let options = SessionOptions {
            theme,
            ..SessionOptions::default()
        };
        Session::new(
            client,
            DialogOrchestrator::default(),
            Arc::new(MemorySettings::default()),
            options,
        )
    }

    fn cycle_theme(app: &mut App) {
        app.process_action(&Action::CycleTheme).unwrap();
        let state = Arc::new(app.session.snapshot());
        app.process_action(&Action::StateUpdated(state)).unwrap();
    }

    #[test]
    fn returning_to_system_theme_rereads_terminal() {
        TERMINAL_DARK.store(false, Ordering::SeqCst);
        let mut app = App::new(session(ThemeMode::Light), terminal_dark);
        assert_eq!(app.palette(), Palette::LIGHT);

        cycle_theme(&mut app);
        assert_eq!(app.state.theme, ThemeMode::Dark);

        // The terminal switched to a dark background meanwhile.
        TERMINAL_DARK.store(true, Ordering::SeqCst);
        cycle_theme(&mut app);
        assert_eq!(app.state.theme, ThemeMode::System);
        assert_eq!(app.palette(), Palette::DARK);
    }
}
