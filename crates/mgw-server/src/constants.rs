//! Server-specific constants
//!
//! Header names, route paths and protocol values used by the transport layer.

// ============================================================================
// HTTP HEADERS
// ============================================================================

/// Protocol version negotiated with the client
pub const PROTOCOL_VERSION_HEADER: &str = "MCP-Protocol-Version";

/// Streaming session identifier
pub const SESSION_ID_HEADER: &str = "Mcp-Session-Id";

/// Last event id presented on reconnect
pub const LAST_EVENT_ID_HEADER: &str = "Last-Event-ID";

/// Seconds until a rate-limited client may retry
pub const RETRY_AFTER_HEADER: &str = "Retry-After";

/// Requests allowed per window
pub const RATE_LIMIT_LIMIT_HEADER: &str = "X-RateLimit-Limit";

/// Requests left in the current window
pub const RATE_LIMIT_REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Seconds until the current window resets
pub const RATE_LIMIT_RESET_HEADER: &str = "X-RateLimit-Reset";

// ============================================================================
// ROUTES
// ============================================================================

/// Modern session-oriented endpoint
pub const MCP_PATH: &str = "/mcp";

/// Legacy message bridge
pub const LEGACY_MESSAGES_PATH: &str = "/messages";

/// Query parameter carrying the legacy session id
pub const LEGACY_SESSION_QUERY: &str = "sessionId";

// ============================================================================
// PROTOCOL
// ============================================================================

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "mcp-gateway";

/// Server version reported by `initialize` and `/health`
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// URI scheme of the host collections exposed as resources
pub const RESOURCE_SCHEME: &str = "gateway://";

/// Notification pushed to open sessions after a successful mutation
pub const RESOURCE_UPDATED_NOTIFICATION: &str = "notifications/resources/updated";

/// MIME type of resource contents
pub const RESOURCE_MIME_TYPE: &str = "application/json";

/// Media type of SSE streams
pub const EVENT_STREAM_MEDIA_TYPE: &str = "text/event-stream";
