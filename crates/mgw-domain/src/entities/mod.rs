//! Host application records
//!
//! Plain data exchanged with the host application's repositories. The
//! gateway never looks at how these are stored; it only moves them between
//! JSON parameters and repository calls.

pub mod activity;
pub mod habit;
pub mod note;
pub mod project;
pub mod question;
pub mod task;

pub use activity::{ActivityAction, ActivityEntry, ActivityFilter, EntityKind};
pub use habit::{Habit, HabitFilter, HabitFrequency, HabitPatch, NewHabit};
pub use note::{NewNote, Note, NoteFilter, NotePatch};
pub use project::{NewProject, Project, ProjectFilter, ProjectPatch};
pub use question::{NewQuestion, Question, QuestionFilter};
pub use task::{NewTask, Task, TaskFilter, TaskPatch, TaskStatus};
