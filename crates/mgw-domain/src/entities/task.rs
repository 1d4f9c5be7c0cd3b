//! Task records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
}

/// A task tracked by the host application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Record id
    pub id: String,
    /// Short title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Owning project, if any
    pub project_id: Option<String>,
    /// Workflow state
    pub status: TaskStatus,
    /// Priority from 1 (highest) to 5 (lowest)
    pub priority: u8,
    /// Due date as an ISO-8601 date string
    pub due_date: Option<String>,
    /// Free-form labels
    pub tags: Vec<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Partial update of a task; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<u8>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Listing filter for tasks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}
