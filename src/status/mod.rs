//! Health status tracking for registered endpoints.
//!
//! The [`StatusStore`] is the single source of truth for endpoint health.
//! The probe scheduler writes outcomes into it; every other component only
//! reads snapshots. It also owns the process-wide "most recent failure"
//! notification ([`ErrorInfo`]).

mod error_info;
mod store;

pub use error_info::{ErrorInfo, ERROR_INFO_TTL};
pub use store::{epoch_ms, EndpointHealth, HealthState, StatusStore};
