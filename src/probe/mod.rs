//! Endpoint probing.
//!
//! A probe is one time-bounded HTTP GET against an endpoint. The
//! [`ProbeScheduler`] issues one probe per endpoint on a fixed cadence,
//! fanning all of them out concurrently, and routes every terminal outcome
//! into the status store. Nothing here ever fails upward; probe errors are
//! data.

mod auth;
mod prober;
mod scheduler;

pub use auth::Credentials;
pub use prober::{probe, ProbeOutcome, PROBE_TIMEOUT};
pub use scheduler::{ProbeScheduler, ProbeTarget, SchedulerHandle, POLL_INTERVAL};
