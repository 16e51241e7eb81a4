//! The probing scheduler.
//!
//! A background task sweeps every registered endpoint on a fixed cadence.
//! Each sweep fans out one task per endpoint, so a hung probe never delays
//! the others. Endpoints added between sweeps are probed the moment they
//! appear on the registry's watch channel.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::probe::{probe, Credentials};
use crate::status::StatusStore;

/// Fixed cadence between full probe sweeps.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// What the scheduler needs to know about one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub id: String,
    pub url: String,
    pub credentials: Credentials,
}

/// Handle to a running scheduler task.
pub struct SchedulerHandle {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    kick_tx: mpsc::UnboundedSender<()>,
}

impl SchedulerHandle {
    /// Request an immediate full sweep, outside the normal cadence.
    pub fn kick(&self) {
        let _ = self.kick_tx.send(());
    }

    /// Stop the scheduler task. In-flight probes finish on their own; their
    /// outcomes are inert if their endpoints are gone by then.
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        self.handle.abort();
        info!("probe scheduler stopped");
    }
}

/// Periodic, credential-aware prober for the full endpoint set.
pub struct ProbeScheduler;

impl ProbeScheduler {
    /// Spawn the scheduler task.
    ///
    /// Must be called from within a tokio runtime. The initial target set is
    /// swept immediately; afterwards one sweep runs every [`POLL_INTERVAL`].
    pub fn spawn(
        store: Arc<StatusStore>,
        client: Client,
        targets_rx: watch::Receiver<Vec<ProbeTarget>>,
    ) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (kick_tx, kick_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_loop(store, client, targets_rx, kick_rx, shutdown_rx));
        info!("probe scheduler started");

        SchedulerHandle {
            handle,
            shutdown_tx,
            kick_tx,
        }
    }
}

async fn run_loop(
    store: Arc<StatusStore>,
    client: Client,
    mut targets_rx: watch::Receiver<Vec<ProbeTarget>>,
    mut kick_rx: mpsc::UnboundedReceiver<()>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(POLL_INTERVAL);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    // Ids seen in the last sweep, used to detect additions between sweeps.
    let mut known: HashSet<String> = HashSet::new();

    loop {
        tokio::select! {
            // The first tick fires immediately, probing the initial set.
            _ = interval.tick() => {
                let targets = targets_rx.borrow_and_update().clone();
                known = targets.iter().map(|t| t.id.clone()).collect();
                debug!(count = targets.len(), "starting probe sweep");
                sweep(&store, &client, targets);
            }
            changed = targets_rx.changed() => {
                if changed.is_err() {
                    // Registry dropped; nothing left to probe.
                    break;
                }
                let targets = targets_rx.borrow_and_update().clone();
                let fresh: Vec<ProbeTarget> = targets
                    .iter()
                    .filter(|t| !known.contains(&t.id))
                    .cloned()
                    .collect();
                known = targets.iter().map(|t| t.id.clone()).collect();
                if !fresh.is_empty() {
                    debug!(count = fresh.len(), "probing newly added endpoints");
                    sweep(&store, &client, fresh);
                }
            }
            Some(()) = kick_rx.recv() => {
                let targets = targets_rx.borrow_and_update().clone();
                known = targets.iter().map(|t| t.id.clone()).collect();
                debug!(count = targets.len(), "manual probe sweep");
                sweep(&store, &client, targets);
            }
            _ = shutdown.changed() => {
                debug!("probe scheduler shutting down");
                break;
            }
        }
    }
}

/// Fan out one probe task per target.
///
/// The optimistic `pending` mark is written synchronously, before the
/// network request is dispatched, so it is visible first.
fn sweep(store: &Arc<StatusStore>, client: &Client, targets: Vec<ProbeTarget>) {
    for target in targets {
        store.mark_pending(&target.id);

        let store = Arc::clone(store);
        let client = client.clone();
        tokio::spawn(async move {
            let outcome = probe(&client, &target.url, &target.credentials).await;
            store.apply_outcome(&target.id, &target.url, outcome);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::HealthState;

    fn target(id: &str, url: &str) -> ProbeTarget {
        ProbeTarget {
            id: id.to_string(),
            url: url.to_string(),
            credentials: Credentials::None,
        }
    }

    /// Poll the store until the endpoint leaves `pending`, within a bound.
    async fn wait_for_settled(store: &StatusStore, id: &str) -> HealthState {
        for _ in 0..500 {
            if let Some(health) = store.get(id) {
                if health.state != HealthState::Pending {
                    return health.state;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("endpoint {id} never settled");
    }

    #[tokio::test]
    async fn initial_targets_are_probed_at_startup() {
        let store = Arc::new(StatusStore::new());
        store.register("e1");

        // Port 1 refuses connections immediately.
        let (_tx, rx) = watch::channel(vec![target("e1", "http://127.0.0.1:1/")]);
        let handle = ProbeScheduler::spawn(Arc::clone(&store), Client::new(), rx);

        let state = wait_for_settled(&store, "e1").await;
        assert_eq!(state, HealthState::Error);
        assert!(store.get("e1").unwrap().message.is_some());

        handle.shutdown();
    }

    #[tokio::test]
    async fn added_endpoint_is_probed_before_next_tick() {
        let store = Arc::new(StatusStore::new());

        let (tx, rx) = watch::channel(Vec::new());
        let handle = ProbeScheduler::spawn(Arc::clone(&store), Client::new(), rx);

        // Give the scheduler its empty first sweep, then add an endpoint.
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.register("e1");
        tx.send(vec![target("e1", "http://127.0.0.1:1/")]).unwrap();

        // Settles well within the 60s cadence, so this must be the
        // immediate add-triggered probe.
        let state = wait_for_settled(&store, "e1").await;
        assert_eq!(state, HealthState::Error);

        handle.shutdown();
    }

    #[tokio::test]
    async fn removed_endpoint_outcome_stays_inert() {
        let store = Arc::new(StatusStore::new());
        store.register("e1");

        let (_tx, rx) = watch::channel(vec![target("e1", "http://127.0.0.1:1/")]);
        let handle = ProbeScheduler::spawn(Arc::clone(&store), Client::new(), rx);

        // Remove while the first sweep may still be in flight.
        store.remove("e1");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(store.get("e1").is_none());
        assert!(store.snapshot().is_empty());

        handle.shutdown();
    }
}
