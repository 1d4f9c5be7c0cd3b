//! Domain layer constants
//!
//! Protocol-level values shared by the codec and the server layer.
//! Infrastructure-specific constants remain in `mgw_infrastructure::constants`.

// ============================================================================
// JSON-RPC PROTOCOL CONSTANTS
// ============================================================================

/// The only accepted JSON-RPC protocol tag value
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard key carrying the protocol tag
pub const JSONRPC_TAG_KEY: &str = "jsonrpc";

/// Alias key accepted for the protocol tag
pub const PROTOCOL_TAG_ALIAS_KEY: &str = "protocolTag";

// ============================================================================
// JSON-RPC ERROR CODES (Standard)
// ============================================================================

/// JSON-RPC Parse error code
pub const JSONRPC_PARSE_ERROR: i32 = -32700;

/// JSON-RPC Invalid request error code
pub const JSONRPC_INVALID_REQUEST: i32 = -32600;

/// JSON-RPC Method not found error code
pub const JSONRPC_METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC Invalid params error code
pub const JSONRPC_INVALID_PARAMS: i32 = -32602;

/// JSON-RPC Internal error code
pub const JSONRPC_INTERNAL_ERROR: i32 = -32603;

// ============================================================================
// JSON-RPC ERROR CODES (Server sub-range)
// ============================================================================

/// Generic host-application failure
pub const JSONRPC_SERVER_ERROR: i32 = -32000;

/// Host application reported a missing record
pub const JSONRPC_RESOURCE_NOT_FOUND: i32 = -32001;

/// Host application storage failure
pub const JSONRPC_DATABASE_ERROR: i32 = -32002;

// ============================================================================
// MCP PROTOCOL VERSIONS
// ============================================================================

/// Protocol versions understood by the gateway, oldest first
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26", "2025-06-18"];

/// Most recent protocol version, used when negotiation finds no match
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";
