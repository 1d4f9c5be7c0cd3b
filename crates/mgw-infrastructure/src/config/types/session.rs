//! Streaming session configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifecycle timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds between heartbeat pings
    pub heartbeat_interval_secs: u64,

    /// Seconds of inactivity before a session is swept
    pub idle_timeout_secs: u64,

    /// Seconds between idle sweeps
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: SESSION_HEARTBEAT_INTERVAL_SECS,
            idle_timeout_secs: SESSION_IDLE_TIMEOUT_SECS,
            sweep_interval_secs: SESSION_SWEEP_INTERVAL_SECS,
        }
    }
}

impl SessionConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}
