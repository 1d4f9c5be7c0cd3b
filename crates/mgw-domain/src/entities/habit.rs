//! Habit records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often a habit is meant to be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HabitFrequency {
    /// Length of one period in seconds
    pub fn period_secs(self) -> i64 {
        match self {
            Self::Daily => 86_400,
            Self::Weekly => 7 * 86_400,
            Self::Monthly => 30 * 86_400,
        }
    }
}

/// A recurring habit with completion tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Record id
    pub id: String,
    /// Display name
    pub name: String,
    /// Longer description
    pub description: Option<String>,
    /// Intended cadence
    pub frequency: HabitFrequency,
    /// Completions wanted per period
    pub target_per_period: u32,
    /// Total completions logged
    pub completion_count: u32,
    /// Consecutive periods with at least one completion
    pub current_streak: u32,
    /// Most recent completion
    pub last_completed_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a habit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub target_per_period: Option<u32>,
}

/// Partial update of a habit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub target_per_period: Option<u32>,
}

/// Listing filter for habits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitFilter {
    pub frequency: Option<HabitFrequency>,
    pub limit: Option<usize>,
}
