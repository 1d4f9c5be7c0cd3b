//! Host call adapters
//!
//! Each domain method turns its (already schema-checked) param object into
//! the typed repository input, calls the host, and serializes the output.
//! Listing methods answer `{<collection>: [...], count}`; deletions answer
//! `{deleted: <id>}`.

use mgw_domain::entities::{
    ActivityFilter, HabitFilter, HabitPatch, NewHabit, NewNote, NewProject, NewQuestion, NewTask,
    NoteFilter, NotePatch, ProjectFilter, ProjectPatch, QuestionFilter, TaskFilter, TaskPatch,
};
use mgw_domain::error::Error;
use mgw_domain::ports::HostServices;
use mgw_domain::rpc::{ErrorCode, FieldViolation, RpcError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::methods::DomainMethod;

type Params = Map<String, Value>;

/// Run one domain method against the host
pub async fn invoke(
    host: &HostServices,
    method: DomainMethod,
    mut params: Params,
) -> Result<Value, RpcError> {
    match method {
        DomainMethod::CreateTask => {
            let input: NewTask = args(params)?;
            record(host.tasks.create_task(input).await)
        }
        DomainMethod::ListTasks => {
            let filter: TaskFilter = args(params)?;
            listing("tasks", host.tasks.list_tasks(filter).await)
        }
        DomainMethod::UpdateTask => {
            let id = take_id(&mut params)?;
            let patch: TaskPatch = args(params)?;
            record(host.tasks.update_task(&id, patch).await)
        }
        DomainMethod::DeleteTask => {
            let id = take_id(&mut params)?;
            deleted(&id, host.tasks.delete_task(&id).await)
        }

        DomainMethod::CreateProject => {
            let input: NewProject = args(params)?;
            record(host.projects.create_project(input).await)
        }
        DomainMethod::ListProjects => {
            let filter: ProjectFilter = args(params)?;
            listing("projects", host.projects.list_projects(filter).await)
        }
        DomainMethod::UpdateProject => {
            let id = take_id(&mut params)?;
            let patch: ProjectPatch = args(params)?;
            record(host.projects.update_project(&id, patch).await)
        }
        DomainMethod::DeleteProject => {
            let id = take_id(&mut params)?;
            deleted(&id, host.projects.delete_project(&id).await)
        }

        DomainMethod::CreateHabit => {
            let input: NewHabit = args(params)?;
            record(host.habits.create_habit(input).await)
        }
        DomainMethod::ListHabits => {
            let filter: HabitFilter = args(params)?;
            listing("habits", host.habits.list_habits(filter).await)
        }
        DomainMethod::UpdateHabit => {
            let id = take_id(&mut params)?;
            let patch: HabitPatch = args(params)?;
            record(host.habits.update_habit(&id, patch).await)
        }
        DomainMethod::DeleteHabit => {
            let id = take_id(&mut params)?;
            deleted(&id, host.habits.delete_habit(&id).await)
        }
        DomainMethod::LogHabitCompletion => {
            let id = take_id(&mut params)?;
            record(host.habits.log_completion(&id).await)
        }

        DomainMethod::CreateNote => {
            let input: NewNote = args(params)?;
            record(host.notes.create_note(input).await)
        }
        DomainMethod::ListNotes => {
            let filter: NoteFilter = args(params)?;
            listing("notes", host.notes.list_notes(filter).await)
        }
        DomainMethod::UpdateNote => {
            let id = take_id(&mut params)?;
            let patch: NotePatch = args(params)?;
            record(host.notes.update_note(&id, patch).await)
        }
        DomainMethod::DeleteNote => {
            let id = take_id(&mut params)?;
            deleted(&id, host.notes.delete_note(&id).await)
        }

        DomainMethod::CreateQuestion => {
            let input: NewQuestion = args(params)?;
            record(host.questions.create_question(input).await)
        }
        DomainMethod::ListQuestions => {
            let filter: QuestionFilter = args(params)?;
            listing("questions", host.questions.list_questions(filter).await)
        }
        DomainMethod::AnswerQuestion => {
            let id = take_id(&mut params)?;
            let answer = take_string(&mut params, "answer")?;
            record(host.questions.answer_question(&id, answer).await)
        }
        DomainMethod::DeleteQuestion => {
            let id = take_id(&mut params)?;
            deleted(&id, host.questions.delete_question(&id).await)
        }

        DomainMethod::ListActivity => {
            let filter: ActivityFilter = args(params)?;
            listing("activity", host.activity.list_activity(filter).await)
        }
    }
}

/// Map a host failure onto the error taxonomy
pub fn host_error(err: Error) -> RpcError {
    match err {
        Error::NotFound { resource } => RpcError::new(
            ErrorCode::ResourceNotFound,
            format!("Resource not found: {resource}"),
        )
        .with_data(json!({ "resource": resource })),
        Error::Database { message, .. } => RpcError::new(ErrorCode::DatabaseError, message),
        Error::Internal { message } => RpcError::internal(message),
        Error::InvalidArgument { message } => violation("params", message),
        other => RpcError::new(ErrorCode::ServerError, other.to_string()),
    }
}

fn violation(field: &str, message: impl Into<String>) -> RpcError {
    RpcError::invalid_params(&[FieldViolation {
        field: field.to_string(),
        message: message.into(),
    }])
}

fn args<T: DeserializeOwned>(params: Params) -> Result<T, RpcError> {
    serde_json::from_value(Value::Object(params)).map_err(|e| violation("params", e.to_string()))
}

fn take_string(params: &mut Params, field: &str) -> Result<String, RpcError> {
    match params.remove(field) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(violation(field, "must be of type string")),
        None => Err(violation(field, "is required")),
    }
}

fn take_id(params: &mut Params) -> Result<String, RpcError> {
    take_string(params, "id")
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal(e.to_string()))
}

fn record<T: Serialize>(outcome: mgw_domain::Result<T>) -> Result<Value, RpcError> {
    to_json(&outcome.map_err(host_error)?)
}

fn listing<T: Serialize>(key: &str, outcome: mgw_domain::Result<Vec<T>>) -> Result<Value, RpcError> {
    let items = outcome.map_err(host_error)?;
    let mut body = Map::new();
    body.insert("count".to_string(), json!(items.len()));
    body.insert(key.to_string(), to_json(&items)?);
    Ok(Value::Object(body))
}

fn deleted(id: &str, outcome: mgw_domain::Result<()>) -> Result<Value, RpcError> {
    outcome.map_err(host_error)?;
    Ok(json!({ "deleted": id }))
}
