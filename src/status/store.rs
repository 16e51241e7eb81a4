//! The health status store.
//!
//! Holds an authoritative mapping of endpoint id to health, plus a transient
//! "pending" overlay for probes that are in flight. Reads merge the overlay
//! over the authoritative entry, so an optimistic `pending` is visible the
//! moment a probe starts and never shows a stale `ok`/`error` while a
//! re-check is running.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::probe::ProbeOutcome;
use crate::status::ErrorInfo;

/// Three-state health classification for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Not yet checked, or a check is in flight.
    Pending,
    /// Last probe was reachable.
    Ok,
    /// Last probe failed.
    Error,
}

impl HealthState {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthState::Pending => "...",
            HealthState::Ok => "OK",
            HealthState::Error => "DOWN",
        }
    }
}

/// Current health of a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointHealth {
    pub state: HealthState,
    /// When the last probe outcome arrived (epoch milliseconds).
    /// `None` until the first check completes.
    pub last_checked: Option<u64>,
    /// Human-readable failure reason, cleared on recovery.
    pub message: Option<String>,
}

impl EndpointHealth {
    fn pending() -> Self {
        Self {
            state: HealthState::Pending,
            last_checked: None,
            message: None,
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[derive(Debug, Default)]
struct Inner {
    /// Authoritative health per endpoint id.
    statuses: HashMap<String, EndpointHealth>,
    /// Overlay of ids with a probe in flight. Cleared when the outcome lands.
    pending: HashSet<String>,
    /// The single most-recent-failure notification.
    last_failure: Option<ErrorInfo>,
}

/// Owns all shared mutable health state.
///
/// All mutation goes through the named operations below; consumers read
/// point-in-time snapshots and must tolerate missing entries (an unknown
/// endpoint is treated as pending).
#[derive(Debug, Default)]
pub struct StatusStore {
    inner: RwLock<Inner>,
}

impl StatusStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint. Its health starts as `pending` with no
    /// timestamp and no message.
    pub fn register(&self, id: &str) {
        let mut inner = self.inner.write();
        inner.statuses.insert(id.to_string(), EndpointHealth::pending());
    }

    /// Reset an endpoint back to `pending` (used when its URL is edited).
    ///
    /// Unknown ids are ignored.
    pub fn reset(&self, id: &str) {
        let mut inner = self.inner.write();
        inner.pending.remove(id);
        if let Some(entry) = inner.statuses.get_mut(id) {
            *entry = EndpointHealth::pending();
        }
    }

    /// Optimistically mark an endpoint as pending because a probe is about
    /// to be dispatched. The authoritative entry is untouched; the overlay
    /// clears when the probe's outcome is applied.
    pub fn mark_pending(&self, id: &str) {
        let mut inner = self.inner.write();
        if inner.statuses.contains_key(id) {
            inner.pending.insert(id.to_string());
        }
    }

    /// Apply a terminal probe outcome.
    ///
    /// If the endpoint was removed while the probe was in flight the outcome
    /// is discarded without re-creating an entry.
    pub fn apply_outcome(&self, id: &str, url: &str, outcome: ProbeOutcome) {
        let mut inner = self.inner.write();
        inner.pending.remove(id);

        if !inner.statuses.contains_key(id) {
            trace!(%id, "discarding outcome for removed endpoint");
            return;
        }

        let now = epoch_ms();
        match outcome {
            ProbeOutcome::Reachable => {
                debug!(%id, %url, "endpoint reachable");
                if let Some(entry) = inner.statuses.get_mut(id) {
                    entry.state = HealthState::Ok;
                    entry.message = None;
                    entry.last_checked = Some(now);
                }
                // Clear the highlighted failure only if it belongs to the
                // endpoint that just recovered.
                if inner
                    .last_failure
                    .as_ref()
                    .is_some_and(|f| f.endpoint_id == id)
                {
                    inner.last_failure = None;
                }
            }
            ProbeOutcome::Unreachable(reason) => {
                warn!(%id, %url, %reason, "endpoint unreachable");
                if let Some(entry) = inner.statuses.get_mut(id) {
                    entry.state = HealthState::Error;
                    entry.message = Some(reason.clone());
                    entry.last_checked = Some(now);
                }
                inner.last_failure = Some(ErrorInfo {
                    endpoint_id: id.to_string(),
                    url: url.to_string(),
                    message: reason,
                    at: Instant::now(),
                });
            }
        }
    }

    /// Remove an endpoint's health entry. In-flight probes for it become
    /// no-ops when their outcomes arrive.
    pub fn remove(&self, id: &str) {
        let mut inner = self.inner.write();
        inner.statuses.remove(id);
        inner.pending.remove(id);
    }

    /// Current health for one endpoint, with the pending overlay applied.
    pub fn get(&self, id: &str) -> Option<EndpointHealth> {
        let inner = self.inner.read();
        inner.statuses.get(id).map(|entry| {
            let mut merged = entry.clone();
            if inner.pending.contains(id) {
                merged.state = HealthState::Pending;
            }
            merged
        })
    }

    /// Point-in-time snapshot of all endpoint health, overlay merged.
    ///
    /// Safe to call from the render loop; never blocks on probes.
    pub fn snapshot(&self) -> HashMap<String, EndpointHealth> {
        let inner = self.inner.read();
        inner
            .statuses
            .iter()
            .map(|(id, entry)| {
                let mut merged = entry.clone();
                if inner.pending.contains(id) {
                    merged.state = HealthState::Pending;
                }
                (id.clone(), merged)
            })
            .collect()
    }

    /// The most recent failure, if it is still fresh.
    pub fn current_failure(&self) -> Option<ErrorInfo> {
        let inner = self.inner.read();
        inner.last_failure.as_ref().filter(|f| f.is_fresh()).cloned()
    }

    /// Dismiss the highlighted failure. Converges with auto-expiry.
    pub fn dismiss_failure(&self) {
        let mut inner = self.inner.write();
        inner.last_failure = None;
    }

    /// Number of tracked endpoints.
    pub fn len(&self) -> usize {
        self.inner.read().statuses.len()
    }

    /// Whether the store tracks no endpoints.
    pub fn is_empty(&self) -> bool {
        self.inner.read().statuses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ERROR_INFO_TTL;
    use std::time::Duration;

    fn reachable() -> ProbeOutcome {
        ProbeOutcome::Reachable
    }

    fn unreachable(reason: &str) -> ProbeOutcome {
        ProbeOutcome::Unreachable(reason.to_string())
    }

    #[test]
    fn registered_endpoint_starts_pending_with_null_timestamp() {
        let store = StatusStore::new();
        store.register("e1");

        let health = store.get("e1").unwrap();
        assert_eq!(health.state, HealthState::Pending);
        assert_eq!(health.last_checked, None);
        assert_eq!(health.message, None);
    }

    #[test]
    fn reachable_outcome_sets_ok_and_clears_message() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", unreachable("DNS failure"));
        store.apply_outcome("e1", "http://a", reachable());

        let health = store.get("e1").unwrap();
        assert_eq!(health.state, HealthState::Ok);
        assert_eq!(health.message, None);
        assert!(health.last_checked.is_some());
    }

    #[test]
    fn timeout_outcome_stores_exact_message() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", unreachable("Request timed out"));

        let health = store.get("e1").unwrap();
        assert_eq!(health.state, HealthState::Error);
        assert_eq!(health.message.as_deref(), Some("Request timed out"));
    }

    #[test]
    fn pending_overlay_visible_before_outcome() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", reachable());

        // Probe starts: pending must be observable immediately.
        store.mark_pending("e1");
        assert_eq!(store.get("e1").unwrap().state, HealthState::Pending);

        // Outcome lands: overlay cleared, authoritative state wins.
        store.apply_outcome("e1", "http://a", reachable());
        assert_eq!(store.get("e1").unwrap().state, HealthState::Ok);
    }

    #[test]
    fn reset_returns_to_pending_from_any_state() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", unreachable("boom"));

        store.reset("e1");
        let health = store.get("e1").unwrap();
        assert_eq!(health.state, HealthState::Pending);
        assert_eq!(health.last_checked, None);
        assert_eq!(health.message, None);
    }

    #[test]
    fn stale_outcome_after_removal_is_discarded() {
        let store = StatusStore::new();
        store.register("e1");
        store.remove("e1");

        store.apply_outcome("e1", "http://a", unreachable("late failure"));
        assert!(store.get("e1").is_none());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn mark_pending_for_unknown_id_is_inert() {
        let store = StatusStore::new();
        store.mark_pending("ghost");
        assert!(store.get("ghost").is_none());
    }

    #[test]
    fn repeated_reachable_is_idempotent_aside_from_timestamp() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", reachable());
        let first = store.get("e1").unwrap();

        store.apply_outcome("e1", "http://a", reachable());
        let second = store.get("e1").unwrap();
        assert_eq!(second.state, HealthState::Ok);
        assert_eq!(second.message, None);
        assert!(second.last_checked >= first.last_checked);
    }

    #[test]
    fn newest_failure_wins_and_unrelated_recovery_keeps_it() {
        let store = StatusStore::new();
        store.register("a");
        store.register("b");

        store.apply_outcome("a", "http://a", unreachable("a down"));
        store.apply_outcome("b", "http://b", unreachable("b down"));

        let failure = store.current_failure().unwrap();
        assert_eq!(failure.endpoint_id, "b");

        // A recovering must not clear B's failure.
        store.apply_outcome("a", "http://a", reachable());
        assert_eq!(store.current_failure().unwrap().endpoint_id, "b");

        // B recovering clears it.
        store.apply_outcome("b", "http://b", reachable());
        assert!(store.current_failure().is_none());
    }

    #[test]
    fn expired_failure_is_filtered_on_read() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", unreachable("boom"));
        assert!(store.current_failure().is_some());

        // Backdate the failure past its TTL; the read path must hide it
        // even though nothing has written since.
        store.inner.write().last_failure.as_mut().unwrap().at =
            Instant::now() - (ERROR_INFO_TTL + Duration::from_millis(10));
        assert!(store.current_failure().is_none());

        // The endpoint's own health is untouched by the expiry.
        assert_eq!(store.get("e1").unwrap().state, HealthState::Error);
    }

    #[test]
    fn dismiss_clears_failure() {
        let store = StatusStore::new();
        store.register("e1");
        store.apply_outcome("e1", "http://a", unreachable("boom"));
        assert!(store.current_failure().is_some());

        store.dismiss_failure();
        assert!(store.current_failure().is_none());
    }

    #[test]
    fn persistent_failure_keeps_message_across_cycles() {
        let store = StatusStore::new();
        store.register("e1");

        for _ in 0..2 {
            store.mark_pending("e1");
            store.apply_outcome("e1", "http://e1", unreachable("Failed to reach endpoint"));
            let health = store.get("e1").unwrap();
            assert_eq!(health.state, HealthState::Error);
            assert_eq!(health.message.as_deref(), Some("Failed to reach endpoint"));
        }
        assert_eq!(store.current_failure().unwrap().endpoint_id, "e1");
    }

    #[test]
    fn snapshot_merges_overlay() {
        let store = StatusStore::new();
        store.register("a");
        store.register("b");
        store.apply_outcome("a", "http://a", reachable());
        store.apply_outcome("b", "http://b", reachable());
        store.mark_pending("b");

        let snapshot = store.snapshot();
        assert_eq!(snapshot["a"].state, HealthState::Ok);
        assert_eq!(snapshot["b"].state, HealthState::Pending);
    }
}
