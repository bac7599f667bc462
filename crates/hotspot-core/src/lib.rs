//! Client-side reconciliation engine for the hotspot console.
//!
//! The backend owns the hotspot itself; this crate keeps a local view of it
//! consistent while the user edits:
//!
//! - **[`Session`]**: owns all state. [`refresh()`](Session::refresh) runs a
//!   full synchronization, [`spawn_poller()`](Session::spawn_poller) keeps
//!   status and clients fresh, and the action methods
//!   ([`save()`](Session::save), [`toggle_hotspot()`](Session::toggle_hotspot),
//!   [`kick_client()`](Session::kick_client)) sequence confirm, progress,
//!   backend calls and reconciliation.
//!
//! - **[`FormState`]**: the editable configuration and its dirty flag. A
//!   dirty form is never overwritten by an unforced refresh.
//!
//! - **[`options`]** / **[`devices`]**: derive channel lists per band and
//!   regulatory capability, and merge reported device lists without losing
//!   the current selection.
//!
//! - **[`DialogOrchestrator`]**: the single modal slot (alert, confirm,
//!   progress) with supersede semantics.
//!
//! - **[`Localizer`]**: embedded translation tables with fallback to the
//!   reference language and `{name}` substitution.

pub mod convert;
pub mod devices;
pub mod dialog;
pub mod error;
pub mod form;
pub mod i18n;
pub mod model;
pub mod options;
pub mod session;
pub mod settings;

// ── Primary re-exports ──────────────────────────────────────────────
pub use devices::{DeviceOption, DeviceOptionKind, DeviceRole, DeviceSelect, merge_devices};
pub use dialog::{
    DialogOrchestrator, DialogView, HeadlessPrompt, ModalButton, ModalKind, ModalRequest,
    ModalView, NativePrompt, ProgressHandle,
};
pub use error::CoreError;
pub use form::{FormState, TextField};
pub use i18n::{Language, Localizer};
pub use model::{Band, ChannelCapability, ClientRecord, HotspotConfig, MacAddress, StatusSnapshot};
pub use options::{ChannelSelect, derive_channels, is_channel_valid_for_band, resync};
pub use session::{
    ActionOutcome, Control, DEFAULT_POLL_INTERVAL, PollOutcome, RefreshOptions, Session,
    SessionEvent, SessionOptions, SessionState,
};
pub use settings::{MemorySettings, SettingsStore, StoredSettings, ThemeMode, prefers_dark};
