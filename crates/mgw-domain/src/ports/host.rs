//! Host Application Repositories
//!
//! The gateway's tool handlers reach the host application only through these
//! traits. Implementations accept and return plain records and report
//! failures as [`crate::Error`]: `NotFound` for missing records, `Database`
//! for storage failures, `InvalidArgument` for rejected input.

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{
    ActivityEntry, ActivityFilter, Habit, HabitFilter, HabitPatch, NewHabit, NewNote, NewProject,
    NewQuestion, NewTask, Note, NoteFilter, NotePatch, Project, ProjectFilter, ProjectPatch,
    Question, QuestionFilter, Task, TaskFilter, TaskPatch,
};
use crate::error::Result;

/// Task storage
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a task
    async fn create_task(&self, input: NewTask) -> Result<Task>;
    /// List tasks matching the filter, newest first
    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>>;
    /// Apply a partial update
    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task>;
    /// Delete a task
    async fn delete_task(&self, id: &str) -> Result<()>;
}

/// Project storage
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create_project(&self, input: NewProject) -> Result<Project>;
    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>>;
    async fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Project>;
    async fn delete_project(&self, id: &str) -> Result<()>;
}

/// Habit storage
#[async_trait]
pub trait HabitRepository: Send + Sync {
    async fn create_habit(&self, input: NewHabit) -> Result<Habit>;
    async fn list_habits(&self, filter: HabitFilter) -> Result<Vec<Habit>>;
    async fn update_habit(&self, id: &str, patch: HabitPatch) -> Result<Habit>;
    async fn delete_habit(&self, id: &str) -> Result<()>;
    /// Record one completion and update the streak
    async fn log_completion(&self, id: &str) -> Result<Habit>;
}

/// Note storage
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create_note(&self, input: NewNote) -> Result<Note>;
    async fn list_notes(&self, filter: NoteFilter) -> Result<Vec<Note>>;
    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Note>;
    async fn delete_note(&self, id: &str) -> Result<()>;
}

/// Q&A storage
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create_question(&self, input: NewQuestion) -> Result<Question>;
    async fn list_questions(&self, filter: QuestionFilter) -> Result<Vec<Question>>;
    /// Record or replace the answer
    async fn answer_question(&self, id: &str, answer: String) -> Result<Question>;
    async fn delete_question(&self, id: &str) -> Result<()>;
}

/// Read access to the activity log
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Entries matching the filter, newest first
    async fn list_activity(&self, filter: ActivityFilter) -> Result<Vec<ActivityEntry>>;
}

/// Bundle of every repository the tool handlers use
#[derive(Clone)]
pub struct HostServices {
    pub tasks: Arc<dyn TaskRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub habits: Arc<dyn HabitRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub activity: Arc<dyn ActivityLog>,
}

impl HostServices {
    /// Use one object for every repository
    pub fn from_single<T>(host: Arc<T>) -> Self
    where
        T: TaskRepository
            + ProjectRepository
            + HabitRepository
            + NoteRepository
            + QuestionRepository
            + ActivityLog
            + 'static,
    {
        Self {
            tasks: host.clone(),
            projects: host.clone(),
            habits: host.clone(),
            notes: host.clone(),
            questions: host.clone(),
            activity: host,
        }
    }
}
