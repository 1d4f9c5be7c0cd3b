//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the server and domain layers.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-layered TOML + environment configuration |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Host Adapters
//! | Module | Description |
//! |--------|-------------|
//! | [`host`] | In-memory implementation of the host application repositories |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod host;
pub mod logging;

// Re-export commonly used types
pub use error_ext::ErrorContext;
