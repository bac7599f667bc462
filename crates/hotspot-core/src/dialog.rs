//! Single-slot modal dialogs.
//!
//! The orchestrator owns at most one modal at a time. Opening a modal
//! supersedes the active one: its cleanup hook runs, a pending confirm
//! resolves `false`, a pending alert counts as acknowledged, and page focus
//! returns to what held it before that modal opened.
//!
//! Three modes are supported:
//!
//! - **alert**: one acknowledgement. [`alert`](DialogOrchestrator::alert)
//!   waits for it, [`notify`](DialogOrchestrator::notify) does not.
//! - **confirm**: accept/decline, resolved through a `oneshot` channel.
//! - **progress**: no affordances; closed through its [`ProgressHandle`],
//!   which only ever closes the modal it opened and also closes on drop.
//!
//! The front end renders the current [`DialogView`] from a `watch` channel
//! and forwards keys and clicks back. Until a front end
//! [attaches](DialogOrchestrator::attach), dialogs go through a blocking
//! [`NativePrompt`] instead.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, watch};
use tracing::{debug, info};

// ── View types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Alert,
    Confirm,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalButton {
    Ok,
    Cancel,
}

/// Renderable state of the active modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub id: u64,
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
    pub ok_text: String,
    pub cancel_text: String,
    /// Focused button; `None` for progress modals.
    pub focused: Option<ModalButton>,
}

impl ModalView {
    pub fn has_actions(&self) -> bool {
        self.kind != ModalKind::Progress
    }

    pub fn has_cancel(&self) -> bool {
        self.kind == ModalKind::Confirm
    }
}

/// Everything the front end needs to draw dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogView {
    pub modal: Option<ModalView>,
    /// Page element that holds focus outside the modal.
    pub page_focus: Option<String>,
}

// ── Requests ─────────────────────────────────────────────────────────

type Cleanup = Box<dyn FnOnce() + Send>;

/// A modal to open. Text is passed already localized.
pub struct ModalRequest {
    kind: ModalKind,
    title: String,
    message: String,
    ok_text: String,
    cancel_text: String,
    cleanup: Option<Cleanup>,
}

impl fmt::Debug for ModalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalRequest")
            .field("kind", &self.kind)
            .field("title", &self.title)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl ModalRequest {
    pub fn alert(
        title: impl Into<String>,
        message: impl Into<String>,
        ok_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: ModalKind::Alert,
            title: title.into(),
            message: message.into(),
            ok_text: ok_text.into(),
            cancel_text: String::new(),
            cleanup: None,
        }
    }

    pub fn confirm(
        title: impl Into<String>,
        message: impl Into<String>,
        ok_text: impl Into<String>,
        cancel_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: ModalKind::Confirm,
            title: title.into(),
            message: message.into(),
            ok_text: ok_text.into(),
            cancel_text: cancel_text.into(),
            cleanup: None,
        }
    }

    pub fn progress(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Progress,
            title: title.into(),
            message: message.into(),
            ok_text: String::new(),
            cancel_text: String::new(),
            cleanup: None,
        }
    }

    /// Hook run exactly once when the modal closes for any reason.
    pub fn on_close(mut self, cleanup: impl FnOnce() + Send + 'static) -> Self {
        self.cleanup = Some(Box::new(cleanup));
        self
    }
}

// ── Native fallback ──────────────────────────────────────────────────

/// Blocking prompt used while no modal surface is attached.
pub trait NativePrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Fallback with no user to ask: alerts are logged, confirms decline.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessPrompt;

impl NativePrompt for HeadlessPrompt {
    fn confirm(&self, message: &str) -> bool {
        info!(message, "confirm declined: no prompt surface");
        false
    }

    fn alert(&self, message: &str) {
        info!(message, "alert");
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────

struct ActiveModal {
    view: ModalView,
    responder: Option<oneshot::Sender<bool>>,
    cleanup: Option<Cleanup>,
    restore_focus: Option<String>,
}

impl ActiveModal {
    fn dismiss(mut self, value: bool) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
        if let Some(tx) = self.responder.take() {
            let _ = tx.send(value);
        }
    }
}

#[derive(Default)]
struct DialogState {
    next_id: u64,
    active: Option<ActiveModal>,
    page_focus: Option<String>,
    attached: bool,
}

impl DialogState {
    fn view(&self) -> DialogView {
        DialogView {
            modal: self.active.as_ref().map(|m| m.view.clone()),
            page_focus: self.page_focus.clone(),
        }
    }
}

struct DialogInner {
    state: Mutex<DialogState>,
    view_tx: watch::Sender<DialogView>,
    fallback: Arc<dyn NativePrompt>,
}

/// Handle to the modal slot. Cheaply cloneable.
#[derive(Clone)]
pub struct DialogOrchestrator {
    inner: Arc<DialogInner>,
}

impl fmt::Debug for DialogOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogOrchestrator")
            .field("view", &*self.inner.view_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl Default for DialogOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(HeadlessPrompt))
    }
}

impl DialogOrchestrator {
    pub fn new(fallback: Arc<dyn NativePrompt>) -> Self {
        let (view_tx, _) = watch::channel(DialogView::default());
        Self {
            inner: Arc::new(DialogInner {
                state: Mutex::new(DialogState::default()),
                view_tx,
                fallback,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DialogState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &DialogState) {
        self.inner.view_tx.send_replace(state.view());
    }

    // ── Surface ──────────────────────────────────────────────────────

    /// A modal surface is available; dialogs render in-app from now on.
    pub fn attach(&self) {
        self.lock().attached = true;
    }

    /// Fall back to the native prompt. Any open modal is closed.
    pub fn detach(&self) {
        self.lock().attached = false;
        self.close();
    }

    pub fn is_attached(&self) -> bool {
        self.lock().attached
    }

    pub fn subscribe(&self) -> watch::Receiver<DialogView> {
        self.inner.view_tx.subscribe()
    }

    pub fn view(&self) -> DialogView {
        self.lock().view()
    }

    pub fn is_open(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Record which page element has focus. Ignored while a modal is open,
    /// since focus then belongs to the modal.
    pub fn set_page_focus(&self, focus: Option<String>) {
        let mut state = self.lock();
        if state.active.is_none() && state.page_focus != focus {
            state.page_focus = focus;
            self.publish(&state);
        }
    }

    // ── Opening ──────────────────────────────────────────────────────

    fn open(&self, request: ModalRequest, responder: Option<oneshot::Sender<bool>>) -> u64 {
        let ModalRequest {
            kind,
            title,
            message,
            ok_text,
            cancel_text,
            cleanup,
        } = request;

        // Every earlier modal is fully dismissed before the new one is shown.
        // Cleanup hooks run unlocked so they may call back in; anything
        // they (or another task) open meanwhile is dismissed in turn.
        let mut state = loop {
            let mut state = self.lock();
            let Some(old) = state.active.take() else {
                break state;
            };
            state.page_focus.clone_from(&old.restore_focus);
            drop(state);
            debug!(old = old.view.id, "modal superseded");
            old.dismiss(false);
        };

        state.next_id += 1;
        let id = state.next_id;
        let focused = (kind != ModalKind::Progress).then_some(ModalButton::Ok);
        state.active = Some(ActiveModal {
            view: ModalView {
                id,
                kind,
                title,
                message,
                ok_text,
                cancel_text,
                focused,
            },
            responder,
            cleanup,
            restore_focus: state.page_focus.clone(),
        });
        self.publish(&state);
        id
    }

    /// Show an alert and wait until it is acknowledged or superseded.
    pub async fn alert(&self, request: ModalRequest) {
        if !self.is_attached() {
            let prompt = Arc::clone(&self.inner.fallback);
            let message = request.message;
            let _ = tokio::task::spawn_blocking(move || prompt.alert(&message)).await;
            return;
        }
        let (tx, rx) = oneshot::channel();
        self.open(request, Some(tx));
        let _ = rx.await;
    }

    /// Show an alert without waiting for it.
    pub fn notify(&self, request: ModalRequest) {
        if self.is_attached() {
            self.open(request, None);
            return;
        }
        let prompt = Arc::clone(&self.inner.fallback);
        let message = request.message;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || prompt.alert(&message));
            }
            Err(_) => prompt.alert(&message),
        }
    }

    /// Ask for confirmation. Escape, backdrop clicks, and being superseded
    /// all count as a decline.
    pub async fn confirm(&self, request: ModalRequest) -> bool {
        if !self.is_attached() {
            let prompt = Arc::clone(&self.inner.fallback);
            let message = request.message;
            return tokio::task::spawn_blocking(move || prompt.confirm(&message))
                .await
                .unwrap_or(false);
        }
        let (tx, rx) = oneshot::channel();
        self.open(request, Some(tx));
        rx.await.unwrap_or(false)
    }

    /// Show a progress modal. Without a surface this is a no-op.
    pub fn progress(&self, request: ModalRequest) -> ProgressHandle {
        if !self.is_attached() {
            return ProgressHandle {
                dialog: None,
                id: 0,
            };
        }
        let id = self.open(request, None);
        ProgressHandle {
            dialog: Some(self.clone()),
            id,
        }
    }

    // ── Closing ──────────────────────────────────────────────────────

    /// Close modal `id` (or whichever is active for `None`) with `value`.
    fn finish(&self, id: Option<u64>, value: bool) -> bool {
        let closed = {
            let mut state = self.lock();
            let matches = state
                .active
                .as_ref()
                .is_some_and(|m| id.is_none_or(|id| m.view.id == id));
            if !matches {
                return false;
            }
            let closed = state.active.take();
            if let Some(modal) = &closed {
                state.page_focus.clone_from(&modal.restore_focus);
            }
            self.publish(&state);
            closed
        };
        if let Some(modal) = closed {
            modal.dismiss(value);
        }
        true
    }

    /// Force-close whatever is open. A pending confirm resolves `false`.
    pub fn close(&self) {
        self.finish(None, false);
    }

    fn active_kind(&self) -> Option<(ModalKind, Option<ModalButton>)> {
        self.lock()
            .active
            .as_ref()
            .map(|m| (m.view.kind, m.view.focused))
    }

    // ── Input ────────────────────────────────────────────────────────
    //
    // Each input method returns whether the modal consumed the event.

    /// Escape: declines a confirm, acknowledges an alert, ignored by
    /// progress.
    pub fn escape(&self) -> bool {
        match self.active_kind() {
            Some((ModalKind::Alert | ModalKind::Confirm, _)) => self.finish(None, false),
            Some((ModalKind::Progress, _)) => true,
            None => false,
        }
    }

    /// Click outside the modal box. Same semantics as escape.
    pub fn backdrop_click(&self) -> bool {
        self.escape()
    }

    /// Enter activates the focused button.
    pub fn enter(&self) -> bool {
        match self.active_kind() {
            Some((ModalKind::Progress, _)) => true,
            Some((_, Some(ModalButton::Ok))) => self.finish(None, true),
            Some((_, Some(ModalButton::Cancel))) => self.finish(None, false),
            Some((_, None)) => true,
            None => false,
        }
    }

    /// OK button.
    pub fn accept(&self) -> bool {
        match self.active_kind() {
            Some((ModalKind::Alert | ModalKind::Confirm, _)) => self.finish(None, true),
            _ => false,
        }
    }

    /// Cancel button.
    pub fn decline(&self) -> bool {
        match self.active_kind() {
            Some((ModalKind::Confirm, _)) => self.finish(None, false),
            _ => false,
        }
    }

    /// Move focus between the confirm buttons.
    pub fn focus_next(&self) -> bool {
        let mut state = self.lock();
        let Some(modal) = state.active.as_mut() else {
            return false;
        };
        if modal.view.kind == ModalKind::Confirm {
            modal.view.focused = match modal.view.focused {
                Some(ModalButton::Ok) => Some(ModalButton::Cancel),
                _ => Some(ModalButton::Ok),
            };
            self.publish(&state);
        }
        true
    }
}

/// Closes the progress modal it opened, and nothing else.
#[must_use = "dropping the handle closes the progress modal"]
pub struct ProgressHandle {
    dialog: Option<DialogOrchestrator>,
    id: u64,
}

impl fmt::Debug for ProgressHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl ProgressHandle {
    pub fn close(mut self) {
        self.close_inner();
    }

    fn close_inner(&mut self) {
        if let Some(dialog) = self.dialog.take() {
            dialog.finish(Some(self.id), false);
        }
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.close_inner();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    fn attached() -> DialogOrchestrator {
        let dialog = DialogOrchestrator::default();
        dialog.attach();
        dialog
    }

    fn confirm_request() -> ModalRequest {
        ModalRequest::confirm("Confirm", "Proceed?", "Continue", "Cancel")
    }

    async fn wait_open(dialog: &DialogOrchestrator) -> ModalView {
        let mut rx = dialog.subscribe();
        let view = rx.wait_for(|v| v.modal.is_some()).await.unwrap();
        view.modal.clone().unwrap()
    }

    #[tokio::test]
    async fn supersede_runs_cleanup_and_declines() {
        let dialog = attached();
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cleaned);
        let observer = dialog.clone();
        // Nothing may be showing while the old cleanup runs.
        let on_close = move || flag.store(!observer.is_open(), Ordering::SeqCst);

        let first = tokio::spawn({
            let dialog = dialog.clone();
            async move { dialog.confirm(confirm_request().on_close(on_close)).await }
        });
        let opened = wait_open(&dialog).await;

        dialog.notify(ModalRequest::alert("Info", "Saved", "OK"));

        assert!(!first.await.unwrap());
        assert!(cleaned.load(Ordering::SeqCst));
        let modal = dialog.view().modal.unwrap();
        assert_eq!(modal.kind, ModalKind::Alert);
        assert!(modal.id > opened.id);
    }

    #[tokio::test]
    async fn progress_over_confirm_declines_it_first() {
        let dialog = attached();
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cleaned);

        let first = tokio::spawn({
            let dialog = dialog.clone();
            async move {
                dialog
                    .confirm(confirm_request().on_close(move || flag.store(true, Ordering::SeqCst)))
                    .await
            }
        });
        wait_open(&dialog).await;

        let progress = dialog.progress(ModalRequest::progress("Saving", "Please wait"));

        assert!(cleaned.load(Ordering::SeqCst));
        assert!(!first.await.unwrap());
        assert_eq!(dialog.view().modal.unwrap().kind, ModalKind::Progress);
        progress.close();
        assert!(!dialog.is_open());
    }

    #[test]
    fn modal_opened_by_cleanup_is_superseded_too() {
        let dialog = attached();
        let follow_up_cleaned = Arc::new(AtomicBool::new(false));

        let hook_dialog = dialog.clone();
        let flag = Arc::clone(&follow_up_cleaned);
        let _one = dialog.progress(ModalRequest::progress("one", "first").on_close(move || {
            hook_dialog.notify(
                ModalRequest::alert("Info", "follow-up", "OK")
                    .on_close(move || flag.store(true, Ordering::SeqCst)),
            );
        }));

        let _two = dialog.progress(ModalRequest::progress("two", "second"));

        assert!(follow_up_cleaned.load(Ordering::SeqCst));
        assert_eq!(dialog.view().modal.unwrap().title, "two");
    }

    #[tokio::test]
    async fn escape_declines_and_enter_accepts() {
        let dialog = attached();

        let pending = tokio::spawn({
            let dialog = dialog.clone();
            async move { dialog.confirm(confirm_request()).await }
        });
        wait_open(&dialog).await;
        assert!(dialog.escape());
        assert!(!pending.await.unwrap());

        let pending = tokio::spawn({
            let dialog = dialog.clone();
            async move { dialog.confirm(confirm_request()).await }
        });
        let modal = wait_open(&dialog).await;
        assert_eq!(modal.focused, Some(ModalButton::Ok));
        assert!(dialog.enter());
        assert!(pending.await.unwrap());
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn enter_on_cancel_declines() {
        let dialog = attached();
        let pending = tokio::spawn({
            let dialog = dialog.clone();
            async move { dialog.confirm(confirm_request()).await }
        });
        wait_open(&dialog).await;
        dialog.focus_next();
        assert_eq!(
            dialog.view().modal.unwrap().focused,
            Some(ModalButton::Cancel)
        );
        dialog.enter();
        assert!(!pending.await.unwrap());
    }

    #[test]
    fn alert_stays_pending_until_acknowledged() {
        let dialog = attached();
        let mut pending = tokio_test::task::spawn(dialog.alert(ModalRequest::alert(
            "Info", "hello", "OK",
        )));
        tokio_test::assert_pending!(pending.poll());
        assert!(dialog.is_open());

        assert!(dialog.accept());
        tokio_test::assert_ready!(pending.poll());
        assert!(!dialog.is_open());
    }

    #[test]
    fn progress_ignores_escape_and_backdrop() {
        let dialog = attached();
        let handle = dialog.progress(ModalRequest::progress("Working", "Saving…"));
        assert!(dialog.escape());
        assert!(dialog.backdrop_click());
        assert!(!dialog.accept());
        assert!(dialog.is_open());
        handle.close();
        assert!(!dialog.is_open());
    }

    #[test]
    fn progress_handle_only_closes_its_own_modal() {
        let dialog = attached();
        let stale = dialog.progress(ModalRequest::progress("Working", "Saving…"));
        let current = dialog.progress(ModalRequest::progress("Working", "Restarting…"));

        stale.close();
        let modal = dialog.view().modal.unwrap();
        assert_eq!(modal.message, "Restarting…");

        drop(current);
        assert!(!dialog.is_open());
    }

    #[test]
    fn focus_returns_to_page_element() {
        let dialog = attached();
        dialog.set_page_focus(Some("ssid".into()));

        let first = dialog.progress(ModalRequest::progress("Working", "one"));
        // Focus moves are ignored while the modal owns focus.
        dialog.set_page_focus(Some("channel".into()));
        let second = dialog.progress(ModalRequest::progress("Working", "two"));
        drop(first);
        drop(second);

        assert_eq!(dialog.view().page_focus.as_deref(), Some("ssid"));
    }

    struct CountingPrompt {
        confirms: AtomicUsize,
        alerts: AtomicUsize,
    }

    impl NativePrompt for CountingPrompt {
        fn confirm(&self, _message: &str) -> bool {
            self.confirms.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn alert(&self, _message: &str) {
            self.alerts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn detached_dialogs_use_native_prompt() {
        let prompt = Arc::new(CountingPrompt {
            confirms: AtomicUsize::new(0),
            alerts: AtomicUsize::new(0),
        });
        let dialog = DialogOrchestrator::new(prompt.clone());

        assert!(dialog.confirm(confirm_request()).await);
        dialog.alert(ModalRequest::alert("Info", "hello", "OK")).await;
        let handle = dialog.progress(ModalRequest::progress("Working", "…"));
        assert!(!dialog.is_open());
        drop(handle);

        assert_eq!(prompt.confirms.load(Ordering::SeqCst), 1);
        assert_eq!(prompt.alerts.load(Ordering::SeqCst), 1);
    }
}
