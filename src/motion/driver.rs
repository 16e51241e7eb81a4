//! The per-frame animation driver.
//!
//! Owns one motion instance per endpoint and steps all of them once per
//! rendered frame against the latest health snapshot. Instances appear when
//! an endpoint does and are dropped when it goes away; nothing is shared
//! between them.

use std::collections::HashMap;

use crate::motion::{FishMotion, Pose};
use crate::status::EndpointHealth;

/// Steps every fish once per frame and hands poses to the renderer.
#[derive(Debug, Default)]
pub struct AquariumDriver {
    fish: HashMap<String, FishMotion>,
}

impl AquariumDriver {
    /// Create an empty driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame.
    ///
    /// `ids` is the current endpoint set in display order; `statuses` is the
    /// latest health snapshot. A missing status entry is treated as pending:
    /// the fish continues whatever it was doing.
    pub fn step(
        &mut self,
        ids: &[String],
        statuses: &HashMap<String, EndpointHealth>,
    ) -> Vec<(String, Pose)> {
        // Drop fish whose endpoints were removed.
        self.fish.retain(|id, _| ids.iter().any(|i| i == id));

        ids.iter()
            .map(|id| {
                let fish = self.fish.entry(id.clone()).or_default();
                let health = statuses.get(id).map(|h| h.state);
                (id.clone(), fish.update(health))
            })
            .collect()
    }

    /// Access the motion instance for one endpoint (for rendering state
    /// such as swim direction).
    pub fn get(&self, id: &str) -> Option<&FishMotion> {
        self.fish.get(id)
    }

    /// Number of live motion instances.
    pub fn len(&self) -> usize {
        self.fish.len()
    }

    /// Whether the tank is empty.
    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }
}
