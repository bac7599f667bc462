// hotspot-api: Async Rust client for the hotspot backend's JSON CGI endpoints

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DEFAULT_LANGUAGE, HotspotClient};
pub use error::Error;
pub use models::{
    Ack, ClientsResponse, ConfigForm, ConfigGetResponse, IfacesResponse, RawChannelOptions,
    RawClient, RawConfig, StatusResponse, UplinksResponse,
};
pub use transport::TransportConfig;
