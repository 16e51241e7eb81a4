//! The endpoint registry.
//!
//! Owns the set of endpoints to watch, persists it as a JSON file, and
//! publishes probe targets to the scheduler through a watch channel. The
//! registry never probes anything itself.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

use crate::probe::{Credentials, ProbeTarget};
use crate::status::epoch_ms;

/// Errors from loading or saving the registry file.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Reading or writing the registry file failed.
    #[error("registry file error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry file is not valid JSON.
    #[error("failed to parse registry file: {0}")]
    Parse(#[from] serde_json::Error),

    /// No endpoint with the given id.
    #[error("endpoint not found: {0}")]
    NotFound(String),
}

/// One watched endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Opaque unique id.
    pub id: String,
    /// URL to probe.
    pub url: String,
    /// Optional human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color name for this endpoint's fish.
    #[serde(default = "default_color")]
    pub color: String,
    /// Creation time, epoch milliseconds.
    pub created_at: u64,
    /// How to authenticate probes.
    #[serde(default)]
    pub credentials: Credentials,
}

fn default_color() -> String {
    "cyan".to_string()
}

/// The set of endpoints to watch, with optional file persistence.
#[derive(Debug)]
pub struct Registry {
    endpoints: Vec<Endpoint>,
    path: Option<PathBuf>,
    targets_tx: watch::Sender<Vec<ProbeTarget>>,
}

impl Registry {
    /// Create an empty, non-persisted registry.
    pub fn new() -> Self {
        let (targets_tx, _) = watch::channel(Vec::new());
        Self {
            endpoints: Vec::new(),
            path: None,
            targets_tx,
        }
    }

    /// Load a registry from a JSON file.
    ///
    /// A missing file is an empty registry, not an error; the file appears
    /// on the first save.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();
        let endpoints = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };

        let mut registry = Self::new();
        registry.endpoints = endpoints;
        registry.path = Some(path);
        registry.publish();
        Ok(registry)
    }

    /// Subscribe to the probe target set. The scheduler holds this end.
    pub fn watch_targets(&self) -> watch::Receiver<Vec<ProbeTarget>> {
        self.targets_tx.subscribe()
    }

    /// Register a new endpoint and return its id.
    pub fn add(
        &mut self,
        url: impl Into<String>,
        description: Option<String>,
        color: Option<String>,
        credentials: Credentials,
    ) -> String {
        let endpoint = Endpoint {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            description,
            color: color.unwrap_or_else(default_color),
            created_at: epoch_ms(),
            credentials,
        };
        let id = endpoint.id.clone();
        self.endpoints.push(endpoint);
        self.publish();
        id
    }

    /// Change an endpoint's URL.
    ///
    /// The registry has no handle on the status store;
    /// [`crate::app::App::edit_endpoint`] pairs this with the reset of the
    /// endpoint's health to pending.
    pub fn update_url(&mut self, id: &str, url: impl Into<String>) -> Result<(), RegistryError> {
        let endpoint = self
            .endpoints
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        endpoint.url = url.into();
        self.publish();
        Ok(())
    }

    /// Remove an endpoint.
    pub fn remove(&mut self, id: &str) -> Result<Endpoint, RegistryError> {
        let index = self
            .endpoints
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        let removed = self.endpoints.remove(index);
        self.publish();
        Ok(removed)
    }

    /// Look up an endpoint by id.
    pub fn get(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// All endpoints in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// Endpoint ids in registration order (display order for the tank).
    pub fn ids(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.id.clone()).collect()
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the registry to its backing file, if it has one.
    pub fn save(&self) -> Result<(), RegistryError> {
        if let Some(ref path) = self.path {
            let json = serde_json::to_string_pretty(&self.endpoints)?;
            fs::write(path, json)?;
        }
        Ok(())
    }

    fn publish(&self) {
        let targets: Vec<ProbeTarget> = self
            .endpoints
            .iter()
            .map(|e| ProbeTarget {
                id: e.id.clone(),
                url: e.url.clone(),
                credentials: e.credentials.clone(),
            })
            .collect();
        let _ = self.targets_tx.send(targets);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
