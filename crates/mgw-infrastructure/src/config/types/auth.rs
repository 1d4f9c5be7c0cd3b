//! Authentication configuration types

use crate::constants::API_KEY_HEADER;
use serde::{Deserialize, Serialize};

/// Shared-secret authentication
///
/// The key is best supplied through `MGW_AUTH__API_KEY` rather than the
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether requests must present the key
    pub enabled: bool,

    /// Header carrying the key
    pub header: String,

    /// Expected key
    pub api_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            header: API_KEY_HEADER.to_string(),
            api_key: None,
        }
    }
}
