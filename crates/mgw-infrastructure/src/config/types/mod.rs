//! Configuration types module

pub mod app;
pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod security;
pub mod server;
pub mod session;

// Re-export main types
pub use app::AppConfig;
pub use auth::AuthConfig;
pub use logging::LoggingConfig;
pub use rate_limit::RateLimitConfig;
pub use security::{SecurityConfig, VersionMode};
pub use server::ServerConfig;
pub use session::SessionConfig;
