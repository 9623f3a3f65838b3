use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::shared::constants::{DEFAULT_DETECTION_CAPACITY, DEFAULT_THRESHOLD};
use crate::shared::label_map::LabelMap;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("threshold must be a finite number, got {0}")]
    InvalidThreshold(f32),
    #[error("at least one output index must be labeled")]
    NoLabels,
}

/// Immutable settings for one detection session.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Location of the compiled graph artifact loaded onto the device.
    pub graph_path: PathBuf,
    pub labels: LabelMap,
    /// Scores must be strictly greater than this to produce a detection.
    pub threshold: f32,
    /// Minimum wall-clock spacing between accepted submissions. Zero disables throttling.
    pub min_interval: Duration,
    /// When set, every read frame is written here as a JPEG for inspection.
    pub debug_snapshot: Option<PathBuf>,
    /// Bound of the detection channel; 0 makes every emission a rendezvous.
    pub detection_capacity: usize,
}

impl SessionConfig {
    pub fn new(graph_path: impl Into<PathBuf>, labels: LabelMap) -> Self {
        Self {
            graph_path: graph_path.into(),
            labels,
            threshold: DEFAULT_THRESHOLD,
            min_interval: Duration::ZERO,
            debug_snapshot: None,
            detection_capacity: DEFAULT_DETECTION_CAPACITY,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_debug_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_snapshot = Some(path.into());
        self
    }

    pub fn with_detection_capacity(mut self, capacity: usize) -> Self {
        self.detection_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        if self.labels.is_empty() {
            return Err(ConfigError::NoLabels);
        }
        Ok(())
    }
}
