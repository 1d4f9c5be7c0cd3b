//! Session Management
//!
//! Tracks open event streams. Each session owns a [`SessionTransport`] that
//! is never handed out; callers address sessions by id only.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`transport`] | Frame type and the channel-backed stream transport |
//! | [`manager`] | Session table, heartbeats, idle sweep |

pub mod manager;
pub mod transport;

use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::constants::{EVENT_STREAM_MEDIA_TYPE, SESSION_ID_HEADER};

pub use manager::{Session, SessionManager, spawn_idle_sweeper};
pub use transport::{ChannelTransport, EventKind, Frame, FrameReceiver, SessionTransport};

static SESSION_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .expect("Invalid regex")
});

/// Fresh random session id
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether `candidate` is a canonical hyphenated UUID
pub fn is_valid_id(candidate: &str) -> bool {
    SESSION_ID_PATTERN.is_match(candidate)
}

/// Headers sent ahead of an event stream
pub fn stream_headers(id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Content-Type", EVENT_STREAM_MEDIA_TYPE.to_string()),
        ("Cache-Control", "no-cache".to_string()),
        ("Connection", "keep-alive".to_string()),
        ("X-Accel-Buffering", "no".to_string()),
        (SESSION_ID_HEADER, id.to_string()),
    ]
}
