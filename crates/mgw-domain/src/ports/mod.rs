//! Domain Port Interfaces
//!
//! Boundary contracts implemented outside the domain layer:
//!
//! - **host** - repositories owned by the host application (tasks, habits, ...)
//! - **clock** - time source, injectable for deterministic tests

/// Time source abstraction
pub mod clock;
/// Host application repositories
pub mod host;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use host::{
    ActivityLog, HabitRepository, HostServices, NoteRepository, ProjectRepository,
    QuestionRepository, TaskRepository,
};
