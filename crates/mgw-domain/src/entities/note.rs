//! Note records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Record id
    pub id: String,
    /// Title
    pub title: String,
    /// Body text
    pub content: String,
    /// Free-form labels
    pub tags: Vec<String>,
    /// Pinned notes sort first
    pub pinned: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

/// Partial update of a note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
}

/// Listing filter for notes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteFilter {
    /// Only notes carrying this tag
    pub tag: Option<String>,
    /// Case-insensitive substring match on title and content
    pub query: Option<String>,
    pub limit: Option<usize>,
}
