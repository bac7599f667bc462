//! Data bridge: forwards session and dialog snapshots into the action loop.
//!
//! The session publishes through `watch` channels; every change becomes an
//! [`Action`] carrying an `Arc` snapshot so screens never lock anything.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use hotspot_core::{Session, SessionEvent};

use crate::action::Action;

pub fn spawn_data_bridge(
    session: &Session,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let mut state_rx = session.subscribe();
    let mut dialog_rx = session.dialog().subscribe();
    let mut events = session.events();

    tokio::spawn(async move {
        // Initial snapshots so screens have data before the first change.
        let _ = action_tx.send(Action::StateUpdated(Arc::new(
            state_rx.borrow_and_update().clone(),
        )));
        let _ = action_tx.send(Action::DialogUpdated(Arc::new(
            dialog_rx.borrow_and_update().clone(),
        )));

        loop {
            let action = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = dialog_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    Action::DialogUpdated(Arc::new(dialog_rx.borrow_and_update().clone()))
                }
                changed = state_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    Action::StateUpdated(Arc::new(state_rx.borrow_and_update().clone()))
                }
                event = events.recv() => {
                    match event {
                        Ok(SessionEvent::Notice(text)) => debug!(notice = %text, "session notice"),
                        Ok(other) => debug!(event = ?other, "session event"),
                        Err(RecvError::Lagged(skipped)) => warn!(skipped, "session events lagged"),
                        Err(RecvError::Closed) => break,
                    }
                    continue;
                }
            };
            if action_tx.send(action).is_err() {
                break;
            }
        }
        debug!("data bridge stopped");
    })
}
