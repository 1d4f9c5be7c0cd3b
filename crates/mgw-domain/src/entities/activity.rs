//! Activity log records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of record an activity entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Project,
    Habit,
    Note,
    Question,
}

/// What happened to the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
    Completed,
    Answered,
}

/// One line of the activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Entry id
    pub id: String,
    /// What happened
    pub action: ActivityAction,
    /// Kind of record affected
    pub entity: EntityKind,
    /// Id of the record affected
    pub entity_id: String,
    /// Human-readable summary
    pub summary: String,
    /// When it happened
    pub at: DateTime<Utc>,
}

/// Listing filter for the activity log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityFilter {
    pub entity: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub limit: Option<usize>,
}
