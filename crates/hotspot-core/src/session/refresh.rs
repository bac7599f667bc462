// ── Synchronization & polling ──
//
// Full synchronization fetches everything in parallel and applies it only
// if every fetch succeeded. The poller is lighter (status and clients) and
// swallows its failures so the UI keeps its last good state.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use hotspot_api::{ClientsResponse, StatusResponse};

use super::{Session, SessionState};
use crate::error::CoreError;
use crate::model::{ClientRecord, HotspotConfig, StatusSnapshot};
use crate::options::update_band_availability;

/// What a full synchronization fetches and how it treats the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshOptions {
    /// Overwrite the form even if it has unsaved edits.
    pub force: bool,
    /// Also fetch and apply the stored configuration.
    pub with_config: bool,
}

impl RefreshOptions {
    /// Start-up and post-save: everything, overwriting the form.
    pub const FULL: Self = Self {
        force: true,
        with_config: true,
    };

    /// After an action: status, clients, and device lists only.
    pub const LIGHT: Self = Self {
        force: false,
        with_config: false,
    };
}

/// Result of one poller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Applied,
    /// The previous tick was still in flight.
    Skipped,
    /// A fetch failed; nothing changed.
    Failed,
}

/// Clears the in-flight flag when the tick ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn apply_status(state: &mut SessionState, status: StatusResponse, clients: ClientsResponse) {
    state.status = StatusSnapshot::from(status.status);
    state.clients = clients.clients.into_iter().map(ClientRecord::from).collect();
}

impl Session {
    /// Fetch backend state and reconcile it into the session.
    ///
    /// Any failed fetch fails the whole refresh and nothing is applied.
    pub async fn refresh(&self, options: RefreshOptions) -> Result<(), CoreError> {
        let client = &self.inner.client;
        debug!(?options, "refreshing");

        if options.with_config {
            let (config, status, clients, ifaces, uplinks) = tokio::try_join!(
                client.config_get(),
                client.status(),
                client.clients(),
                client.ifaces(),
                client.uplinks(),
            )?;

            let corrected = self.update(|s| {
                if let Some(capability) = config.channel_options {
                    s.form.set_capability(capability.into());
                }
                s.form.refresh_devices(&ifaces.ifaces, &uplinks.uplinks);
                if let Some(raw) = config.config {
                    let loaded = s.form.load(&HotspotConfig::from(raw), options.force);
                    debug!(loaded, dirty = s.form.is_dirty(), "configuration reconciled");
                }
                let capability = s.form.capability().clone();
                let corrected = update_band_availability(&mut s.form, &capability);
                apply_status(s, status, clients);
                s.synced = true;
                corrected
            });

            if corrected {
                self.notify(self.t("msg.no5g"));
            }
            return Ok(());
        }

        let (status, clients, ifaces, uplinks) = tokio::try_join!(
            client.status(),
            client.clients(),
            client.ifaces(),
            client.uplinks(),
        )?;
        self.update(|s| {
            s.form.refresh_devices(&ifaces.ifaces, &uplinks.uplinks);
            apply_status(s, status, clients);
        });
        Ok(())
    }

    /// Start-up synchronization. A failure is shown to the user and
    /// returned; the session stays usable and the poller can still run.
    pub async fn initial_sync(&self) -> Result<(), CoreError> {
        self.refresh(RefreshOptions::FULL).await.inspect_err(|e| {
            warn!(error = %e, "initial synchronization failed");
            self.notify(e.user_message(self.localizer()));
        })
    }

    /// One poller tick: status and clients, never overlapping the
    /// previous tick. Failures are logged and swallowed.
    pub async fn poll_tick(&self) -> PollOutcome {
        let Some(_in_flight) = InFlight::acquire(&self.inner.poll_in_flight) else {
            debug!("poll skipped: previous tick still in flight");
            return PollOutcome::Skipped;
        };

        let client = &self.inner.client;
        match tokio::try_join!(client.status(), client.clients()) {
            Ok((status, clients)) => {
                self.update(|s| apply_status(s, status, clients));
                PollOutcome::Applied
            }
            Err(e) => {
                debug!(error = %e, "status poll failed");
                PollOutcome::Failed
            }
        }
    }

    /// Spawn the recurring status poller. Each period spawns one tick;
    /// ticks that find the previous one in flight do nothing.
    pub fn spawn_poller(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let session = self.clone();
        let period = self.inner.poll_interval;

        tokio::spawn(async move {
            info!(period_secs = period.as_secs(), "status poller started");
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await; // consume the immediate first tick

            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        let session = session.clone();
                        tokio::spawn(async move {
                            session.poll_tick().await;
                        });
                    }
                }
            }
            info!("status poller stopped");
        })
    }
}
