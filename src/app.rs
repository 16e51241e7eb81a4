//! Application state and navigation logic.

use std::collections::HashMap;
use std::sync::Arc;

use crate::motion::{AquariumDriver, Pose};
use crate::probe::SchedulerHandle;
use crate::registry::{Registry, RegistryError};
use crate::status::{EndpointHealth, HealthState, StatusStore};
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The ambient aquarium.
    Tank,
    /// Table of all endpoints with status detail.
    Endpoints,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Tank => View::Endpoints,
            View::Endpoints => View::Tank,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Tank => "Tank",
            View::Endpoints => "Endpoints",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    /// Endpoint set and persistence.
    pub registry: Registry,
    /// Shared health state, written by the scheduler.
    pub store: Arc<StatusStore>,
    /// Health snapshot taken this frame; views read this instead of
    /// locking the store again.
    pub statuses: HashMap<String, EndpointHealth>,
    /// Fish poses computed this frame, in registry order.
    pub poses: Vec<(String, Pose)>,

    /// Selected endpoint index (registry order).
    pub selected_index: usize,

    pub theme: Theme,

    driver: AquariumDriver,
    scheduler: Option<SchedulerHandle>,
    source_description: String,
}

impl App {
    /// Create a new App over a registry and its shared status store.
    pub fn new(registry: Registry, store: Arc<StatusStore>) -> Self {
        let source_description = registry
            .path()
            .map(|p| format!("file: {}", p.display()))
            .unwrap_or_else(|| "in-memory registry".to_string());
        Self {
            running: true,
            current_view: View::Tank,
            show_help: false,
            registry,
            store,
            statuses: HashMap::new(),
            poses: Vec::new(),
            selected_index: 0,
            theme: Theme::auto_detect(),
            driver: AquariumDriver::new(),
            scheduler: None,
            source_description,
        }
    }

    /// Attach the running probe scheduler so the UI can kick it.
    pub fn with_scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Returns a description of where the endpoint set comes from.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Advance the animation by one rendered frame.
    ///
    /// Reads the latest status snapshot without blocking; in-flight probes
    /// just mean some entries read as pending.
    pub fn frame(&mut self) {
        self.statuses = self.store.snapshot();
        let ids = self.registry.ids();
        self.poses = self.driver.step(&ids, &self.statuses);

        if self.selected_index >= self.registry.len() {
            self.selected_index = self.registry.len().saturating_sub(1);
        }
    }

    /// Change an endpoint's URL and reset its health to pending.
    ///
    /// The two writes always go together: whatever the old URL's status
    /// was, the new URL has not been checked yet.
    pub fn edit_endpoint(
        &mut self,
        id: &str,
        url: impl Into<String>,
    ) -> Result<(), RegistryError> {
        self.registry.update_url(id, url)?;
        self.store.reset(id);
        Ok(())
    }

    /// Endpoint counts by health: (ok, error, pending), from this frame's
    /// snapshot.
    ///
    /// Endpoints without a status entry count as pending.
    pub fn health_counts(&self) -> (usize, usize, usize) {
        let mut ok = 0;
        let mut error = 0;
        let mut pending = 0;
        for endpoint in self.registry.iter() {
            match self.statuses.get(&endpoint.id).map(|h| h.state) {
                Some(HealthState::Ok) => ok += 1,
                Some(HealthState::Error) => error += 1,
                Some(HealthState::Pending) | None => pending += 1,
            }
        }
        (ok, error, pending)
    }

    /// Id of the currently selected endpoint.
    pub fn selected_id(&self) -> Option<String> {
        self.registry
            .iter()
            .nth(self.selected_index)
            .map(|e| e.id.clone())
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Move selection down by one endpoint.
    pub fn select_next(&mut self) {
        let max = self.registry.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max);
    }

    /// Move selection up by one endpoint.
    pub fn select_prev(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Dismiss the most-recent-failure banner.
    pub fn dismiss_error(&mut self) {
        self.store.dismiss_failure();
    }

    /// Ask the scheduler for an immediate sweep.
    pub fn probe_now(&self) {
        if let Some(ref scheduler) = self.scheduler {
            scheduler.kick();
        }
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Stop the background scheduler. Called once on the way out.
    pub fn shutdown(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown();
        }
    }
}
