//! Rate limiting configuration types

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-client fixed-window rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether requests are counted at all
    pub enabled: bool,

    /// Requests allowed per client per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: RATE_LIMIT_DEFAULT_MAX_REQUESTS,
            window_secs: RATE_LIMIT_DEFAULT_WINDOW_SECS,
        }
    }
}

impl RateLimitConfig {
    /// Window length
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
