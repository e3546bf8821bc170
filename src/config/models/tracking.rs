//! Location tracking configuration

use serde::{Deserialize, Serialize};

/// Sampling-policy and realtime-channel tuning
///
/// A raw sample is persisted when the elapsed time since the last stored
/// sample exceeds `min_interval_secs` or the displacement exceeds
/// `min_distance_m`. The defaults bound write volume without losing
/// fidelity during movement or long idle periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Time threshold between persisted samples, in seconds
    #[serde(default = "default_min_interval_secs")]
    pub min_interval_secs: u64,
    /// Distance threshold between persisted samples, in meters
    #[serde(default = "default_min_distance_m")]
    pub min_distance_m: f64,
    /// Fan accepted samples out to other registered channels
    #[serde(default = "default_broadcast_enabled")]
    pub broadcast_enabled: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: default_min_interval_secs(),
            min_distance_m: default_min_distance_m(),
            broadcast_enabled: default_broadcast_enabled(),
        }
    }
}

#[allow(dead_code)]
impl TrackingConfig {
    /// Merge tracking configurations (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.min_interval_secs != default_min_interval_secs() {
            self.min_interval_secs = other.min_interval_secs;
        }
        if other.min_distance_m != default_min_distance_m() {
            self.min_distance_m = other.min_distance_m;
        }
        if other.broadcast_enabled != default_broadcast_enabled() {
            self.broadcast_enabled = other.broadcast_enabled;
        }
        self
    }
}

fn default_min_interval_secs() -> u64 {
    120
}

fn default_min_distance_m() -> f64 {
    20.0
}

fn default_broadcast_enabled() -> bool {
    true
}
