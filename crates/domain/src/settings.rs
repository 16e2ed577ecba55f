//! Capability manager settings value object
//!
//! Settings carry serde derives so hosts can load them from configuration
//! files or environment-driven overrides.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Default activation sweep throttle: 10 sweeps per second.
pub const DEFAULT_UPDATE_INTERVAL_SECONDS: f32 = 0.1;

/// Tunables for a single capability manager
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerSettings {
    /// Minimum time between periodic activation sweeps. Ticking itself runs
    /// every frame regardless of this value.
    #[serde(default = "default_update_interval_seconds")]
    pub update_interval_seconds: f32,
}

fn default_update_interval_seconds() -> f32 {
    DEFAULT_UPDATE_INTERVAL_SECONDS
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            update_interval_seconds: DEFAULT_UPDATE_INTERVAL_SECONDS,
        }
    }
}

impl ManagerSettings {
    pub fn with_update_interval(mut self, seconds: f32) -> Self {
        self.update_interval_seconds = seconds;
        self
    }

    /// Reject intervals that would break the throttle comparison.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.update_interval_seconds.is_finite() {
            return Err(DomainError::validation(
                "update interval must be a finite number of seconds",
            ));
        }
        if self.update_interval_seconds < 0.0 {
            return Err(DomainError::validation(format!(
                "update interval cannot be negative (got {})",
                self.update_interval_seconds
            )));
        }
        Ok(())
    }
}
