//! UI actions. Key handlers produce them, the app loop applies them.

use std::sync::Arc;

use hotspot_core::{Band, DeviceRole, DialogView, SessionState, TextField};

use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Render,
    Resize(u16, u16),
    SwitchScreen(ScreenId),

    // ── Data from the session ──
    StateUpdated(Arc<SessionState>),
    DialogUpdated(Arc<DialogView>),

    // ── Form edits ──
    PushChar(TextField, char),
    PopChar(TextField),
    SelectDevice(DeviceRole, String),
    SelectBand(Band),
    SelectChannel(u16),
    /// The focused element of the page, for restoring after a modal.
    PageFocus(String),
    TogglePassword,

    // ── Backend actions ──
    Save,
    ToggleHotspot,
    Kick(String),

    // ── Preferences ──
    CycleLanguage,
    CycleTheme,
}
