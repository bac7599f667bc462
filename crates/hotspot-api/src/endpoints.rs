// Hotspot backend endpoints
//
// One CGI script per operation, all relative to the client's base URL.
// Reads and the start/stop/kick commands are GETs; only `config_set.cgi`
// takes a form-encoded POST body.

use tracing::debug;

use crate::client::HotspotClient;
use crate::error::Error;
use crate::models::{
    Ack, ClientsResponse, ConfigForm, ConfigGetResponse, IfacesResponse, StatusResponse,
    UplinksResponse,
};

impl HotspotClient {
    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the stored configuration and the radio's channel capability.
    ///
    /// `GET config_get.cgi`
    pub async fn config_get(&self) -> Result<ConfigGetResponse, Error> {
        let url = self.endpoint_url("config_get.cgi", &[])?;
        debug!("fetching hotspot configuration");
        self.get(url).await
    }

    /// Fetch the hotspot status object.
    ///
    /// `GET status.cgi`
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.endpoint_url("status.cgi", &[])?;
        self.get(url).await
    }

    /// List stations associated with the access point.
    ///
    /// `GET clients.cgi`
    pub async fn clients(&self) -> Result<ClientsResponse, Error> {
        let url = self.endpoint_url("clients.cgi", &[])?;
        self.get(url).await
    }

    /// List wireless devices able to host the access point.
    ///
    /// `GET ifaces.cgi`
    pub async fn ifaces(&self) -> Result<IfacesResponse, Error> {
        let url = self.endpoint_url("ifaces.cgi", &[])?;
        self.get(url).await
    }

    /// List devices whose connection can be shared.
    ///
    /// `GET uplinks.cgi`
    pub async fn uplinks(&self) -> Result<UplinksResponse, Error> {
        let url = self.endpoint_url("uplinks.cgi", &[])?;
        self.get(url).await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Store a new configuration. Does not restart a running hotspot.
    ///
    /// `POST config_set.cgi` (form-encoded)
    pub async fn config_set(&self, form: &ConfigForm) -> Result<Ack, Error> {
        let url = self.endpoint_url("config_set.cgi", &[])?;
        debug!(ssid = %form.ssid, band = %form.band, channel = %form.channel, "saving configuration");
        self.post_form(url, form).await
    }

    /// Bring the hotspot up.
    ///
    /// `GET start.cgi`
    pub async fn start(&self) -> Result<Ack, Error> {
        let url = self.endpoint_url("start.cgi", &[])?;
        debug!("starting hotspot");
        self.get(url).await
    }

    /// Take the hotspot down.
    ///
    /// `GET stop.cgi`
    pub async fn stop(&self) -> Result<Ack, Error> {
        let url = self.endpoint_url("stop.cgi", &[])?;
        debug!("stopping hotspot");
        self.get(url).await
    }

    /// Disconnect a station. `mac` is sent as given; callers normalize it.
    ///
    /// `GET kick.cgi?mac=<mac>`
    pub async fn kick(&self, mac: &str) -> Result<Ack, Error> {
        let url = self.endpoint_url("kick.cgi", &[("mac", mac)])?;
        debug!(mac, "kicking client");
        self.get(url).await
    }
}
