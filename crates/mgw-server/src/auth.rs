//! Shared-secret authentication
//!
//! When enabled, every request except `/health` must carry the configured API
//! key header (default `X-Api-Key`). The check runs after the security gate
//! and before the body is parsed.
//!
//! # Configuration
//!
//! - Config file: `auth.enabled = true` and `auth.api_key = "your-key"`
//! - Environment variable: `MGW_AUTH__API_KEY=your-key`

use mgw_infrastructure::config::AuthConfig;
use mgw_infrastructure::constants::API_KEY_HEADER;
use rocket::http::Status;

use crate::rejection::Rejection;

/// API key check applied to every gateway route but `/health`
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    pub enabled: bool,
    /// Header carrying the key
    pub header_name: String,
    pub api_key: Option<String>,
}

impl ApiKeyAuth {
    pub fn new(enabled: bool, header_name: String, api_key: Option<String>) -> Self {
        Self {
            enabled,
            header_name,
            api_key,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.enabled, config.header.clone(), config.api_key.clone())
    }

    /// Compare against the configured key in constant time
    pub fn validate_key(&self, provided: &str) -> bool {
        match &self.api_key {
            Some(expected) => constant_time_eq(expected.as_bytes(), provided.as_bytes()),
            None => false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Check the key presented in the configured header
    pub fn check(&self, provided: Option<&str>) -> Result<(), Rejection> {
        if !self.enabled {
            return Ok(());
        }
        if !self.is_configured() {
            return Err(Rejection::new(
                Status::ServiceUnavailable,
                "auth_not_configured",
                "Authentication is enabled but no API key is configured. \
                 Set MGW_AUTH__API_KEY or auth.api_key in config.",
            ));
        }
        match provided {
            Some(key) if self.validate_key(key) => Ok(()),
            Some(_) => Err(Rejection::unauthorized("invalid_api_key", "Invalid API key")),
            None => Err(Rejection::unauthorized(
                "missing_api_key",
                format!(
                    "API key required. Provide it in the '{}' header.",
                    self.header_name
                ),
            )),
        }
    }
}

impl Default for ApiKeyAuth {
    fn default() -> Self {
        Self::new(false, API_KEY_HEADER.to_string(), None)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
