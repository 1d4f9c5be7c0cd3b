//! Configuration
//!
//! [`AppConfig`] is assembled by [`ConfigLoader`] from built-in defaults, an
//! optional TOML file and `MGW_`-prefixed environment variables.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, AuthConfig, LoggingConfig, RateLimitConfig, SecurityConfig, ServerConfig,
    SessionConfig, VersionMode,
};
