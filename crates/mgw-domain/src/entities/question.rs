//! Q&A records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question with an optional answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Record id
    pub id: String,
    /// Question text
    pub question: String,
    /// Answer text, once given
    pub answer: Option<String>,
    /// Free-form labels
    pub tags: Vec<String>,
    /// When the answer was recorded
    pub answered_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a question
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewQuestion {
    pub question: String,
    pub answer: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Listing filter for questions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionFilter {
    pub answered: Option<bool>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}
