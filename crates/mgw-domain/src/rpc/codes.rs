//! JSON-RPC error code taxonomy
//!
//! The five standard codes plus the server sub-range used for failures
//! surfaced by the host application.

use crate::constants::{
    JSONRPC_DATABASE_ERROR, JSONRPC_INTERNAL_ERROR, JSONRPC_INVALID_PARAMS,
    JSONRPC_INVALID_REQUEST, JSONRPC_METHOD_NOT_FOUND, JSONRPC_PARSE_ERROR,
    JSONRPC_RESOURCE_NOT_FOUND, JSONRPC_SERVER_ERROR,
};

/// Error kinds the gateway can report inside a JSON-RPC envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Body was not valid JSON
    ParseError,
    /// Body was JSON but not a valid request object
    InvalidRequest,
    /// No handler is registered under the requested method name
    MethodNotFound,
    /// Parameters failed schema validation
    InvalidParams,
    /// A handler failed in an unexpected way
    InternalError,
    /// Generic host-application failure
    ServerError,
    /// Host application could not find the addressed record
    ResourceNotFound,
    /// Host application storage failure
    DatabaseError,
}

impl ErrorCode {
    /// Numeric wire code
    pub fn code(self) -> i32 {
        match self {
            Self::ParseError => JSONRPC_PARSE_ERROR,
            Self::InvalidRequest => JSONRPC_INVALID_REQUEST,
            Self::MethodNotFound => JSONRPC_METHOD_NOT_FOUND,
            Self::InvalidParams => JSONRPC_INVALID_PARAMS,
            Self::InternalError => JSONRPC_INTERNAL_ERROR,
            Self::ServerError => JSONRPC_SERVER_ERROR,
            Self::ResourceNotFound => JSONRPC_RESOURCE_NOT_FOUND,
            Self::DatabaseError => JSONRPC_DATABASE_ERROR,
        }
    }

    /// Look up the kind for a numeric wire code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            JSONRPC_PARSE_ERROR => Some(Self::ParseError),
            JSONRPC_INVALID_REQUEST => Some(Self::InvalidRequest),
            JSONRPC_METHOD_NOT_FOUND => Some(Self::MethodNotFound),
            JSONRPC_INVALID_PARAMS => Some(Self::InvalidParams),
            JSONRPC_INTERNAL_ERROR => Some(Self::InternalError),
            JSONRPC_SERVER_ERROR => Some(Self::ServerError),
            JSONRPC_RESOURCE_NOT_FOUND => Some(Self::ResourceNotFound),
            JSONRPC_DATABASE_ERROR => Some(Self::DatabaseError),
            _ => None,
        }
    }

    /// Default human-readable message
    pub fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ServerError => "Server error",
            Self::ResourceNotFound => "Resource not found",
            Self::DatabaseError => "Database error",
        }
    }

    /// Whether the failure was caused by the caller rather than the server
    pub fn is_client_fault(self) -> bool {
        matches!(
            self,
            Self::ParseError | Self::InvalidRequest | Self::MethodNotFound | Self::InvalidParams
        )
    }
}
