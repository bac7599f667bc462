// ── Action sequencing ──
//
// Multi-step user actions: confirm, progress, backend call(s), notice, and
// reconcile. Every action holds a lease on its control for its whole run;
// a second invocation while the lease is held is refused without touching
// the network. On failure the progress modal closes (handles close on
// drop), the backend message is shown verbatim, and the form is left as
// the user had it.

use tracing::{debug, info, warn};

use hotspot_api::ConfigForm;

use super::{Control, RefreshOptions, Session};
use crate::dialog::ModalRequest;
use crate::error::CoreError;
use crate::model::{MacAddress, StatusSnapshot};

/// How an action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The user declined a confirmation.
    Canceled,
    /// The control already had an action in flight.
    Busy,
    /// A step failed; carries the message shown to the user.
    Failed(String),
}

/// Marks a control busy until dropped.
struct ControlLease {
    session: Session,
    control: Control,
}

impl Drop for ControlLease {
    fn drop(&mut self) {
        let control = self.control.clone();
        self.session.update(|s| s.busy.remove(&control));
    }
}

impl Session {
    fn try_lease(&self, control: Control) -> Option<ControlLease> {
        let acquired = self.update(|s| s.busy.insert(control.clone()));
        if acquired {
            Some(ControlLease {
                session: self.clone(),
                control,
            })
        } else {
            debug!(?control, "control busy");
            None
        }
    }

    fn conclude(&self, action: &str, result: Result<ActionOutcome, CoreError>) -> ActionOutcome {
        match result {
            Ok(outcome) => {
                info!(action, ?outcome, "action finished");
                outcome
            }
            Err(e) => {
                warn!(action, error = %e, "action failed");
                let message = e.user_message(self.localizer());
                self.notify(message.clone());
                ActionOutcome::Failed(message)
            }
        }
    }

    // ── Save ─────────────────────────────────────────────────────────

    /// Store the form. A running hotspot is restarted so the new settings
    /// take effect.
    pub async fn save(&self) -> ActionOutcome {
        let Some(_lease) = self.try_lease(Control::Save) else {
            return ActionOutcome::Busy;
        };
        let result = self.run_save().await;
        self.conclude("save", result)
    }

    async fn run_save(&self) -> Result<ActionOutcome, CoreError> {
        let (form, running) = {
            let state = self.lock();
            (ConfigForm::from(&state.form.read()), state.status.running)
        };

        let progress = self.progress(self.t("progress.save"));
        self.inner.client.config_set(&form).await?;
        progress.close();

        if running {
            let progress = self.progress(self.t("progress.restart"));
            self.inner.client.stop().await?;
            self.inner.client.start().await?;
            progress.close();
            self.notify(self.t("msg.savedRestart"));
            self.refresh(RefreshOptions::LIGHT).await?;
        } else {
            self.notify(self.t("msg.saved"));
            self.refresh(RefreshOptions::FULL).await?;
        }
        Ok(ActionOutcome::Completed)
    }

    // ── Hotspot on/off ───────────────────────────────────────────────

    /// Flip the hotspot based on the last seen running state.
    pub async fn toggle_hotspot(&self) -> ActionOutcome {
        let Some(_lease) = self.try_lease(Control::Toggle) else {
            return ActionOutcome::Busy;
        };
        let running = self.lock().status.running;
        let result = if running {
            self.run_stop().await
        } else {
            self.run_start().await
        };
        self.conclude("toggle", result)
    }

    pub async fn start_hotspot(&self) -> ActionOutcome {
        let Some(_lease) = self.try_lease(Control::Toggle) else {
            return ActionOutcome::Busy;
        };
        let result = self.run_start().await;
        self.conclude("start", result)
    }

    pub async fn stop_hotspot(&self) -> ActionOutcome {
        let Some(_lease) = self.try_lease(Control::Toggle) else {
            return ActionOutcome::Busy;
        };
        let result = self.run_stop().await;
        self.conclude("stop", result)
    }

    async fn run_stop(&self) -> Result<ActionOutcome, CoreError> {
        let progress = self.progress(self.t("progress.disable"));
        self.inner.client.stop().await?;
        progress.close();
        self.notify(self.t("msg.disabled"));
        self.refresh(RefreshOptions::LIGHT).await?;
        Ok(ActionOutcome::Completed)
    }

    async fn run_start(&self) -> Result<ActionOutcome, CoreError> {
        // Radios without STA+AP concurrency drop the current Wi-Fi link.
        let pre = StatusSnapshot::from(self.inner.client.status().await?.status);
        if pre.start_needs_confirmation() && !self.confirm_disconnect(&pre).await {
            self.notify(self.t("msg.canceled"));
            return Ok(ActionOutcome::Canceled);
        }

        let progress = self.progress(self.t("progress.enable"));
        self.inner.client.start().await?;
        progress.close();
        self.notify(self.t("msg.enabled"));
        self.refresh(RefreshOptions::LIGHT).await?;
        Ok(ActionOutcome::Completed)
    }

    async fn confirm_disconnect(&self, status: &StatusSnapshot) -> bool {
        let l10n = self.localizer();
        let con_part = status
            .parent_active_connection
            .as_deref()
            .map(|name| l10n.text("hotspot.conPart", &[("name", name)]))
            .unwrap_or_default();
        let request = ModalRequest::confirm(
            l10n.t("hotspot.confirmTitle"),
            l10n.text("hotspot.confirmMsg", &[("conPart", &con_part)]),
            l10n.t("hotspot.confirmOk"),
            l10n.t("hotspot.confirmCancel"),
        );
        self.inner.dialog.confirm(request).await
    }

    // ── Kick ─────────────────────────────────────────────────────────

    /// Disconnect a station after confirmation. Only canonical MAC
    /// addresses (after normalization) are accepted.
    pub async fn kick_client(&self, mac: &str) -> ActionOutcome {
        let mac = MacAddress::new(mac);
        if !mac.is_canonical() {
            debug!(%mac, "refusing to kick non-canonical MAC");
            return ActionOutcome::Canceled;
        }
        let Some(_lease) = self.try_lease(Control::Kick(mac.clone())) else {
            return ActionOutcome::Busy;
        };
        let result = self.run_kick(&mac).await;
        self.conclude("kick", result)
    }

    async fn run_kick(&self, mac: &MacAddress) -> Result<ActionOutcome, CoreError> {
        let (l10n, ip) = {
            let state = self.lock();
            let ip = state
                .clients
                .iter()
                .find(|c| &c.mac == mac)
                .map(|c| c.ip.clone())
                .filter(|ip| !ip.is_empty());
            (state.localizer(), ip)
        };
        let ip_part = ip.map(|ip| format!("\n{ip}")).unwrap_or_default();

        let request = ModalRequest::confirm(
            l10n.t("kick.title"),
            l10n.text("kick.confirm", &[("mac", mac.as_str()), ("ip", &ip_part)]),
            l10n.t("btn.kick"),
            l10n.t("btn.cancel"),
        );
        if !self.inner.dialog.confirm(request).await {
            return Ok(ActionOutcome::Canceled);
        }

        let progress = self.progress(self.t("kick.progress"));
        self.inner.client.kick(mac.as_str()).await?;
        progress.close();
        self.notify(self.t("kick.done"));
        self.refresh(RefreshOptions::LIGHT).await?;
        Ok(ActionOutcome::Completed)
    }
}
