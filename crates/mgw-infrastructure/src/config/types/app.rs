//! Main application configuration

use serde::{Deserialize, Serialize};

use super::{
    AuthConfig, LoggingConfig, RateLimitConfig, SecurityConfig, ServerConfig, SessionConfig,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener configuration
    pub server: ServerConfig,
    /// Security gate configuration
    pub security: SecurityConfig,
    /// Per-client rate limiting
    pub rate_limit: RateLimitConfig,
    /// Streaming session lifecycle
    pub session: SessionConfig,
    /// Shared-secret authentication
    pub auth: AuthConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}
