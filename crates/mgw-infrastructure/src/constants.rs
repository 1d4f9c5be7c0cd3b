//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Protocol constants are defined in `mgw_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "mgw.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "mgw";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "MGW";

/// Separator for nested keys in environment variables (`MGW_SERVER__PORT`)
pub const CONFIG_ENV_NESTING: &str = "__";

// ============================================================================
// HTTP SERVER CONSTANTS
// ============================================================================

/// Default bind address
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_SERVER_PORT: u16 = 3001;

/// Default maximum accepted request body (1 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECURITY CONSTANTS
// ============================================================================

/// Origins accepted out of the box: loopback pages only
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://127.0.0.1",
    "https://localhost",
    "https://127.0.0.1",
    "*.localhost",
];

// ============================================================================
// AUTHENTICATION CONSTANTS
// ============================================================================

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "X-Api-Key";

// ============================================================================
// RATE LIMIT CONSTANTS
// ============================================================================

/// Requests allowed per client per window
pub const RATE_LIMIT_DEFAULT_MAX_REQUESTS: u32 = 120;

/// Rate-limit window length in seconds
pub const RATE_LIMIT_DEFAULT_WINDOW_SECS: u64 = 60;

// ============================================================================
// SESSION CONSTANTS
// ============================================================================

/// Interval between heartbeat pings on an open stream
pub const SESSION_HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Inactivity after which a session is swept (1 hour)
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 3600;

/// Interval between idle sweeps (5 minutes)
pub const SESSION_SWEEP_INTERVAL_SECS: u64 = 300;

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "MGW_LOG";
