//! # reefwatch
//!
//! An ambient uptime monitor: every registered HTTP endpoint is a fish in a
//! terminal aquarium. Healthy fish swim lazy circles; a failing endpoint's
//! fish rolls belly-up and floats to the surface; once the endpoint
//! recovers, the fish rights itself and dives back down. The tank tells you
//! the state of your fleet at a glance, without reading logs or dashboards.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ registry ──(probe targets)──▶ probe::scheduler               │
//! │                                   │ one GET per endpoint,    │
//! │                                   │ 60s cadence, 10s timeout │
//! │                                   ▼                          │
//! │                            status::StatusStore               │
//! │                                   │ snapshot each frame      │
//! │                                   ▼                          │
//! │ motion::AquariumDriver ──(poses)──▶ ui (tank / endpoints)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`registry`]**: the endpoint set, persisted as a JSON file, published
//!   to the scheduler over a watch channel
//! - **[`probe`]**: credential-aware probing - auth header building, the
//!   per-probe timeout race, and the concurrent sweep scheduler
//! - **[`status`]**: the health state machine per endpoint plus the
//!   process-wide most-recent-failure notification
//! - **[`motion`]**: per-endpoint motion state machines deriving continuous
//!   movement from discrete health transitions, stepped once per frame
//! - **[`ui`]**: ratatui rendering - the tank, the endpoints table, themes
//!
//! ## Usage
//!
//! ```bash
//! # Watch the endpoints in endpoints.json
//! reefwatch --file endpoints.json
//!
//! # Register an endpoint and start watching
//! reefwatch --add https://example.com/healthz
//!
//! # One-shot headless check (prints a table, exits non-zero if any are down)
//! reefwatch --check
//! ```
//!
//! ## As a library
//!
//! ```
//! use std::sync::Arc;
//! use reefwatch::{Credentials, Registry, StatusStore};
//!
//! let mut registry = Registry::new();
//! let id = registry.add("https://example.com", None, None, Credentials::None);
//!
//! let store = Arc::new(StatusStore::new());
//! store.register(&id);
//! assert!(store.get(&id).is_some());
//! ```

pub mod app;
pub mod events;
pub mod motion;
pub mod probe;
pub mod registry;
pub mod status;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use motion::{AquariumDriver, FishMotion, MotionPhase, Pose};
pub use probe::{Credentials, ProbeOutcome, ProbeScheduler, ProbeTarget, SchedulerHandle};
pub use registry::{Endpoint, Registry, RegistryError};
pub use status::{EndpointHealth, ErrorInfo, HealthState, StatusStore};
pub use ui::Theme;
