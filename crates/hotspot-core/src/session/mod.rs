// ── Session ──
//
// Owns all reconciliation state for one console. The front end drives it
// through typed method calls and observes it through a `watch` snapshot
// plus a `broadcast` event stream. Shared state sits behind a std mutex
// that is never held across an `.await`; fetch results are applied in one
// critical section.

mod actions;
mod refresh;

use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use hotspot_api::HotspotClient;

use crate::devices::DeviceRole;
use crate::dialog::{DialogOrchestrator, ModalRequest, ProgressHandle};
use crate::error::CoreError;
use crate::form::{FormState, TextField};
use crate::i18n::{Language, Localizer};
use crate::model::{Band, ClientRecord, MacAddress, StatusSnapshot};
use crate::settings::{SettingsStore, StoredSettings, ThemeMode};

pub use actions::ActionOutcome;
pub use refresh::{PollOutcome, RefreshOptions};

const EVENT_CHANNEL_SIZE: usize = 64;

/// Default period of the status poller.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

// ── Public types ─────────────────────────────────────────────────────

/// A UI affordance that can run at most one action at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    Save,
    Toggle,
    Kick(MacAddress),
}

/// Notifications for the front end beyond the state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// All text must be re-resolved.
    LanguageChanged(Language),
    ThemeChanged(ThemeMode),
    /// A notice was shown to the user.
    Notice(String),
}

/// Everything the front end renders.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub language: Language,
    pub theme: ThemeMode,
    pub form: FormState,
    pub status: StatusSnapshot,
    pub clients: Vec<ClientRecord>,
    /// Controls with an action in flight; they render disabled.
    pub busy: HashSet<Control>,
    pub password_visible: bool,
    /// At least one full synchronization has been applied.
    pub synced: bool,
}

impl SessionState {
    pub fn localizer(&self) -> Localizer {
        Localizer::new(self.language)
    }

    pub fn is_busy(&self, control: &Control) -> bool {
        self.busy.contains(control)
    }

    /// Hotspot toggle label, with a connectivity suffix while running.
    pub fn toggle_label(&self) -> String {
        let l10n = self.localizer();
        if !self.status.running {
            return l10n.t("toggle.off");
        }
        let suffix = match self.status.internet_ok {
            Some(true) => l10n.t("toggle.suffix.net"),
            Some(false) => l10n.t("toggle.suffix.nonnet"),
            None => String::new(),
        };
        format!("{}{suffix}", l10n.t("toggle.on"))
    }
}

/// Start-up choices for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub language: Language,
    pub theme: ThemeMode,
    pub poll_interval: Duration,
}

impl SessionOptions {
    /// Persisted settings win; the locale decides the language otherwise.
    pub fn from_settings(stored: &StoredSettings, locale: Option<&str>) -> Self {
        Self {
            language: stored
                .language
                .unwrap_or_else(|| Language::initial(None, locale)),
            theme: stored.theme,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            theme: ThemeMode::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

// ── Session ──────────────────────────────────────────────────────────

/// The reconciliation engine. Cheaply cloneable via `Arc<SessionInner>`.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: HotspotClient,
    dialog: DialogOrchestrator,
    settings: Arc<dyn SettingsStore>,
    state: Mutex<SessionState>,
    snapshot_tx: watch::Sender<SessionState>,
    event_tx: broadcast::Sender<SessionEvent>,
    poll_in_flight: AtomicBool,
    poll_interval: Duration,
}

impl Session {
    pub fn new(
        client: HotspotClient,
        dialog: DialogOrchestrator,
        settings: Arc<dyn SettingsStore>,
        options: SessionOptions,
    ) -> Self {
        client.set_language(options.language.code());
        let state = SessionState {
            language: options.language,
            theme: options.theme,
            ..SessionState::default()
        };
        let (snapshot_tx, _) = watch::channel(state.clone());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Self {
            inner: Arc::new(SessionInner {
                client,
                dialog,
                settings,
                state: Mutex::new(state),
                snapshot_tx,
                event_tx,
                poll_in_flight: AtomicBool::new(false),
                poll_interval: options.poll_interval,
            }),
        }
    }

    pub fn dialog(&self) -> &DialogOrchestrator {
        &self.inner.dialog
    }

    pub fn client(&self) -> &HotspotClient {
        &self.inner.client
    }

    /// Latest state, updated after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.snapshot_tx.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn localizer(&self) -> Localizer {
        self.lock().localizer()
    }

    // ── State plumbing ───────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate state in one critical section and publish the result.
    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.lock();
        let out = f(&mut state);
        self.inner.snapshot_tx.send_replace(state.clone());
        out
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.event_tx.send(event);
    }

    fn t(&self, key: &str) -> String {
        self.localizer().t(key)
    }

    /// Show a notice without waiting for acknowledgement.
    pub(crate) fn notify(&self, message: String) {
        let l10n = self.localizer();
        self.inner.dialog.notify(ModalRequest::alert(
            l10n.t("title.tip"),
            message.clone(),
            l10n.t("btn.ok"),
        ));
        self.emit(SessionEvent::Notice(message));
    }

    pub(crate) fn progress(&self, message: String) -> ProgressHandle {
        self.inner
            .dialog
            .progress(ModalRequest::progress(self.t("title.progress"), message))
    }

    // ── Form edits ───────────────────────────────────────────────────

    /// Apply an arbitrary edit to the form.
    pub fn edit<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        self.update(|s| f(&mut s.form))
    }

    pub fn set_text(&self, field: TextField, value: impl Into<String>) {
        let value = value.into();
        self.edit(|form| form.set_text(field, value));
    }

    pub fn select_band(&self, band: Band) -> bool {
        self.edit(|form| form.select_band(band))
    }

    pub fn select_channel(&self, channel: u16) -> bool {
        self.edit(|form| form.select_channel(channel))
    }

    pub fn select_device(&self, role: DeviceRole, value: &str) -> bool {
        self.edit(|form| form.select_device(role, value))
    }

    pub fn toggle_password_visible(&self) -> bool {
        self.update(|s| {
            s.password_visible = !s.password_visible;
            s.password_visible
        })
    }

    // ── Language & theme ─────────────────────────────────────────────

    /// Switch language: swap the active table, persist it, tell the front
    /// end to re-render, then re-synchronize without touching the form so
    /// backend-generated text follows the new language too.
    pub async fn set_language(&self, language: Language) -> Result<(), CoreError> {
        self.inner.client.set_language(language.code());
        self.update(|s| s.language = language);
        self.persist(|stored| stored.language = Some(language));
        info!(language = language.code(), "language changed");
        self.emit(SessionEvent::LanguageChanged(language));

        if let Err(e) = self.refresh(RefreshOptions::LIGHT).await {
            warn!(error = %e, "refresh after language switch failed");
            self.notify(e.user_message(self.localizer()));
            return Err(e);
        }
        Ok(())
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        self.update(|s| s.theme = theme);
        self.persist(|stored| stored.theme = theme);
        debug!(%theme, "theme changed");
        self.emit(SessionEvent::ThemeChanged(theme));
    }

    fn persist(&self, change: impl FnOnce(&mut StoredSettings)) {
        let mut stored = self.inner.settings.load();
        change(&mut stored);
        if let Err(e) = self.inner.settings.save(&stored) {
            warn!(error = %e, "failed to persist settings");
        }
    }
}
