//! JSON-RPC 2.0 Message Codec
//!
//! Everything needed to turn raw request bytes into a typed [`RpcRequest`]
//! and to build the matching [`RpcResponse`]. The codec is pure: no I/O, no
//! shared state.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`codes`] | Error code taxonomy |
//! | [`message`] | Request, response and error envelopes |
//! | [`parse`] | Raw body parsing with per-rejection error codes |
//! | [`schema`] | Tool parameter schemas and validation |

pub mod codes;
pub mod message;
pub mod parse;
pub mod schema;

pub use codes::ErrorCode;
pub use message::{RequestId, ResponsePayload, RpcError, RpcRequest, RpcResponse, TagKey};
pub use parse::{ParseFailure, parse, parse_value};
pub use schema::{
    FieldViolation, PropertySchema, PropertyType, ToolSchema, ValidationReport, validate_params,
};
