//! # MCP Gateway Server
//!
//! Transport, session and tool dispatch layer of the MCP gateway.
//!
//! ## Request flow
//!
//! ```text
//! HTTP request
//!   -> rate limit        (rate_limit)
//!   -> security gate     (security)
//!   -> shared-secret auth (auth)
//!   -> parse + validate  (mgw_domain::rpc, tools::registry)
//!   -> dispatch          (tools::router -> host)
//!   -> response / session frame
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tools`] | Method table, manifest registry and dispatch |
//! | [`session`] | Session table, heartbeats and idle sweep |
//! | [`security`] | Version, origin, session id and content-type checks |
//! | [`rate_limit`] | Fixed window per-client limiter |
//! | [`auth`] | Shared-secret API key check |
//! | [`transport`] | Rocket routes, responders and catchers |
//! | [`init`] | Startup |

// Allow Rust 2024 compatibility issues from Rocket's codegen
#![allow(rust_2024_compatibility)]

pub mod auth;
pub mod constants;
pub mod init;
pub mod rate_limit;
pub mod rejection;
pub mod security;
pub mod session;
pub mod tools;
pub mod transport;

pub use init::run;
pub use rejection::Rejection;
pub use transport::{GatewayState, gateway_rocket};
