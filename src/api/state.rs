use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::inference::Classifier;

/// Shared application state for API handlers
///
/// Holds the one process-wide classifier (model + encoder), built at startup
/// and injected into every handler; nothing here mutates after boot.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self {
            classifier,
            start_time: Utc::now(),
        }
    }

    /// Get process uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
