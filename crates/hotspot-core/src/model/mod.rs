// ── Domain model ──
//
// Canonical types the engine reconciles. Raw backend payloads are
// converted into these in `convert.rs`.

mod band;
mod client;
mod config;
mod mac;
mod status;

pub use band::Band;
pub use client::ClientRecord;
pub use config::{ChannelCapability, HotspotConfig};
pub use mac::MacAddress;
pub use status::StatusSnapshot;
