//! Project records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project grouping tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Record id
    pub id: String,
    /// Display name
    pub name: String,
    /// Longer description
    pub description: Option<String>,
    /// Display color, e.g. `#3366ff`
    pub color: Option<String>,
    /// Archived projects are hidden from default listings
    pub archived: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Partial update of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub archived: Option<bool>,
}

/// Listing filter for projects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFilter {
    pub include_archived: bool,
    pub limit: Option<usize>,
}
