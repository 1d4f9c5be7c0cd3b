//! Security gate configuration types

use crate::constants::DEFAULT_ALLOWED_ORIGINS;
use mgw_domain::constants::SUPPORTED_PROTOCOL_VERSIONS;
use serde::{Deserialize, Serialize};

/// How the modern transport treats the protocol-version header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionMode {
    /// Header required; unknown versions rejected
    Strict,
    /// Absent header accepted; unknown versions logged and tolerated
    #[default]
    Relaxed,
}

/// Security gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Protocol-version policy for `/mcp`
    pub version_mode: VersionMode,

    /// Accepted protocol versions
    pub supported_versions: Vec<String>,

    /// Origin whitelist: exact origins, `*.domain` host suffixes, or `*`
    pub allowed_origins: Vec<String>,

    /// Reject `/mcp` POSTs that carry no session id
    pub require_session: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            version_mode: VersionMode::default(),
            supported_versions: SUPPORTED_PROTOCOL_VERSIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
            require_session: false,
        }
    }
}
