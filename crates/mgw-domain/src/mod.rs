//! # MCP Gateway Domain
//!
//! Core types shared by every layer of the gateway:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`rpc`] | JSON-RPC 2.0 message codec, error taxonomy and parameter schemas |
//! | [`entities`] | Records owned by the host application (tasks, habits, notes, ...) |
//! | [`ports`] | Boundary contracts the host application and the runtime implement |
//! | [`error`] | Domain error type and `Result` alias |
//! | [`constants`] | Protocol constants |
//!
//! The domain layer has no knowledge of HTTP, sessions or configuration.

pub mod constants;
pub mod entities;
pub mod error;
pub mod ports;
pub mod rpc;

pub use error::{Error, Result};
