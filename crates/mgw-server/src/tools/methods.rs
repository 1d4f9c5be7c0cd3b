//! Method name tables
//!
//! Dispatch is a `match` over these enums; no method is ever looked up
//! dynamically.

use mgw_domain::entities::EntityKind;

/// Protocol-level methods handled by the gateway itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaMethod {
    Initialize,
    Ping,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    InitializedNotification,
}

impl MetaMethod {
    pub const ALL: [Self; 7] = [
        Self::Initialize,
        Self::Ping,
        Self::ToolsList,
        Self::ToolsCall,
        Self::ResourcesList,
        Self::ResourcesRead,
        Self::InitializedNotification,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Ping => "ping",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::ResourcesList => "resources/list",
            Self::ResourcesRead => "resources/read",
            Self::InitializedNotification => "notifications/initialized",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

/// Host application operations listed in the tool manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainMethod {
    CreateTask,
    ListTasks,
    UpdateTask,
    DeleteTask,
    CreateProject,
    ListProjects,
    UpdateProject,
    DeleteProject,
    CreateHabit,
    ListHabits,
    UpdateHabit,
    DeleteHabit,
    LogHabitCompletion,
    CreateNote,
    ListNotes,
    UpdateNote,
    DeleteNote,
    CreateQuestion,
    ListQuestions,
    AnswerQuestion,
    DeleteQuestion,
    ListActivity,
}

impl DomainMethod {
    pub const ALL: [Self; 22] = [
        Self::CreateTask,
        Self::ListTasks,
        Self::UpdateTask,
        Self::DeleteTask,
        Self::CreateProject,
        Self::ListProjects,
        Self::UpdateProject,
        Self::DeleteProject,
        Self::CreateHabit,
        Self::ListHabits,
        Self::UpdateHabit,
        Self::DeleteHabit,
        Self::LogHabitCompletion,
        Self::CreateNote,
        Self::ListNotes,
        Self::UpdateNote,
        Self::DeleteNote,
        Self::CreateQuestion,
        Self::ListQuestions,
        Self::AnswerQuestion,
        Self::DeleteQuestion,
        Self::ListActivity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ListTasks => "list_tasks",
            Self::UpdateTask => "update_task",
            Self::DeleteTask => "delete_task",
            Self::CreateProject => "create_project",
            Self::ListProjects => "list_projects",
            Self::UpdateProject => "update_project",
            Self::DeleteProject => "delete_project",
            Self::CreateHabit => "create_habit",
            Self::ListHabits => "list_habits",
            Self::UpdateHabit => "update_habit",
            Self::DeleteHabit => "delete_habit",
            Self::LogHabitCompletion => "log_habit_completion",
            Self::CreateNote => "create_note",
            Self::ListNotes => "list_notes",
            Self::UpdateNote => "update_note",
            Self::DeleteNote => "delete_note",
            Self::CreateQuestion => "create_question",
            Self::ListQuestions => "list_questions",
            Self::AnswerQuestion => "answer_question",
            Self::DeleteQuestion => "delete_question",
            Self::ListActivity => "list_activity",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Record kind the method operates on; `None` for the activity log
    pub fn entity(self) -> Option<EntityKind> {
        match self {
            Self::CreateTask | Self::ListTasks | Self::UpdateTask | Self::DeleteTask => {
                Some(EntityKind::Task)
            }
            Self::CreateProject
            | Self::ListProjects
            | Self::UpdateProject
            | Self::DeleteProject => Some(EntityKind::Project),
            Self::CreateHabit
            | Self::ListHabits
            | Self::UpdateHabit
            | Self::DeleteHabit
            | Self::LogHabitCompletion => Some(EntityKind::Habit),
            Self::CreateNote | Self::ListNotes | Self::UpdateNote | Self::DeleteNote => {
                Some(EntityKind::Note)
            }
            Self::CreateQuestion
            | Self::ListQuestions
            | Self::AnswerQuestion
            | Self::DeleteQuestion => Some(EntityKind::Question),
            Self::ListActivity => None,
        }
    }
}

/// Any method the gateway answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Meta(MetaMethod),
    Domain(DomainMethod),
}

impl Method {
    pub fn from_name(name: &str) -> Option<Self> {
        MetaMethod::from_name(name)
            .map(Self::Meta)
            .or_else(|| DomainMethod::from_name(name).map(Self::Domain))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meta(m) => m.as_str(),
            Self::Domain(m) => m.as_str(),
        }
    }
}
