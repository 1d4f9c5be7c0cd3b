//! In-memory host repositories
//!
//! Every collection lives in its own `DashMap`. Listing order is newest first,
//! using an insertion sequence so records created within the same clock tick
//! still sort deterministically. Each successful mutation appends one entry
//! to the activity log.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use mgw_domain::entities::{
    ActivityAction, ActivityEntry, ActivityFilter, EntityKind, Habit, HabitFilter, HabitPatch,
    NewHabit, NewNote, NewProject, NewQuestion, NewTask, Note, NoteFilter, NotePatch, Project,
    ProjectFilter, ProjectPatch, Question, QuestionFilter, Task, TaskFilter, TaskPatch,
};
use mgw_domain::error::{Error, Result};
use mgw_domain::ports::{
    ActivityLog, HabitRepository, HostServices, NoteRepository, ProjectRepository,
    QuestionRepository, SharedClock, SystemClock, TaskRepository,
};

const DEFAULT_PRIORITY: u8 = 3;
const MIN_PRIORITY: u8 = 1;
const MAX_PRIORITY: u8 = 5;

#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    record: T,
}

/// Process-local implementation of every host repository
#[derive(Debug)]
pub struct InMemoryHost {
    clock: SharedClock,
    seq: AtomicU64,
    tasks: DashMap<String, Stored<Task>>,
    projects: DashMap<String, Stored<Project>>,
    habits: DashMap<String, Stored<Habit>>,
    notes: DashMap<String, Stored<Note>>,
    questions: DashMap<String, Stored<Question>>,
    activity: RwLock<Vec<ActivityEntry>>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemoryHost {
    /// Create an empty host reading time from `clock`
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            seq: AtomicU64::new(0),
            tasks: DashMap::new(),
            projects: DashMap::new(),
            habits: DashMap::new(),
            notes: DashMap::new(),
            questions: DashMap::new(),
            activity: RwLock::new(Vec::new()),
        }
    }

    /// Wrap a fresh host as the service bundle the tool handlers use
    pub fn services(clock: SharedClock) -> HostServices {
        HostServices::from_single(Arc::new(Self::new(clock)))
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    fn record(&self, action: ActivityAction, entity: EntityKind, entity_id: &str, summary: String) {
        let entry = ActivityEntry {
            id: Uuid::new_v4().to_string(),
            action,
            entity,
            entity_id: entity_id.to_string(),
            summary,
            at: self.now(),
        };
        debug!(?action, ?entity, entity_id, "activity recorded");
        self.activity
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{field} must not be empty")));
    }
    Ok(())
}

fn check_priority(priority: u8) -> Result<u8> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(priority)
    } else {
        Err(Error::invalid_argument(format!(
            "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}"
        )))
    }
}

/// Collect matching records newest first, honouring an optional limit
fn newest_first<T: Clone>(
    map: &DashMap<String, Stored<T>>,
    keep: impl Fn(&T) -> bool,
    limit: Option<usize>,
) -> Vec<T> {
    let mut matched: Vec<(u64, T)> = map
        .iter()
        .filter(|entry| keep(&entry.value().record))
        .map(|entry| (entry.value().seq, entry.value().record.clone()))
        .collect();
    matched.sort_by(|a, b| b.0.cmp(&a.0));
    matched
        .into_iter()
        .map(|(_, record)| record)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

fn not_found(kind: &str, id: &str) -> Error {
    Error::not_found(format!("{kind} {id}"))
}

#[async_trait]
impl TaskRepository for InMemoryHost {
    async fn create_task(&self, input: NewTask) -> Result<Task> {
        require_text("title", &input.title)?;
        let priority = check_priority(input.priority.unwrap_or(DEFAULT_PRIORITY))?;
        let now = self.now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            project_id: input.project_id,
            status: input.status.unwrap_or_default(),
            priority,
            due_date: input.due_date,
            tags: input.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(
            task.id.clone(),
            Stored {
                seq: self.next_seq(),
                record: task.clone(),
            },
        );
        self.record(
            ActivityAction::Created,
            EntityKind::Task,
            &task.id,
            format!("Created task \"{}\"", task.title),
        );
        Ok(task)
    }

    async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        Ok(newest_first(
            &self.tasks,
            |task| {
                filter
                    .project_id
                    .as_ref()
                    .is_none_or(|p| task.project_id.as_ref() == Some(p))
                    && filter.status.is_none_or(|s| task.status == s)
                    && filter.tag.as_ref().is_none_or(|t| task.tags.contains(t))
            },
            filter.limit,
        ))
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        if let Some(priority) = patch.priority {
            check_priority(priority)?;
        }
        let updated = {
            let mut entry = self.tasks.get_mut(id).ok_or_else(|| not_found("task", id))?;
            let task = &mut entry.record;
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if patch.description.is_some() {
                task.description = patch.description;
            }
            if patch.project_id.is_some() {
                task.project_id = patch.project_id;
            }
            if let Some(status) = patch.status {
                task.status = status;
            }
            if patch.due_date.is_some() {
                task.due_date = patch.due_date;
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
            }
            task.updated_at = self.now();
            task.clone()
        };
        self.record(
            ActivityAction::Updated,
            EntityKind::Task,
            id,
            format!("Updated task \"{}\"", updated.title),
        );
        Ok(updated)
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let (_, removed) = self.tasks.remove(id).ok_or_else(|| not_found("task", id))?;
        self.record(
            ActivityAction::Deleted,
            EntityKind::Task,
            id,
            format!("Deleted task \"{}\"", removed.record.title),
        );
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryHost {
    async fn create_project(&self, input: NewProject) -> Result<Project> {
        require_text("name", &input.name)?;
        let now = self.now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            color: input.color,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        self.projects.insert(
            project.id.clone(),
            Stored {
                seq: self.next_seq(),
                record: project.clone(),
            },
        );
        self.record(
            ActivityAction::Created,
            EntityKind::Project,
            &project.id,
            format!("Created project \"{}\"", project.name),
        );
        Ok(project)
    }

    async fn list_projects(&self, filter: ProjectFilter) -> Result<Vec<Project>> {
        Ok(newest_first(
            &self.projects,
            |project| filter.include_archived || !project.archived,
            filter.limit,
        ))
    }

    async fn update_project(&self, id: &str, patch: ProjectPatch) -> Result<Project> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        let updated = {
            let mut entry = self
                .projects
                .get_mut(id)
                .ok_or_else(|| not_found("project", id))?;
            let project = &mut entry.record;
            if let Some(name) = patch.name {
                project.name = name;
            }
            if patch.description.is_some() {
                project.description = patch.description;
            }
            if patch.color.is_some() {
                project.color = patch.color;
            }
            if let Some(archived) = patch.archived {
                project.archived = archived;
            }
            project.updated_at = self.now();
            project.clone()
        };
        self.record(
            ActivityAction::Updated,
            EntityKind::Project,
            id,
            format!("Updated project \"{}\"", updated.name),
        );
        Ok(updated)
    }

    async fn delete_project(&self, id: &str) -> Result<()> {
        let (_, removed) = self
            .projects
            .remove(id)
            .ok_or_else(|| not_found("project", id))?;
        // Tasks outlive their project; they just lose the link.
        for mut task in self.tasks.iter_mut() {
            if task.record.project_id.as_deref() == Some(id) {
                task.record.project_id = None;
            }
        }
        self.record(
            ActivityAction::Deleted,
            EntityKind::Project,
            id,
            format!("Deleted project \"{}\"", removed.record.name),
        );
        Ok(())
    }
}

/// Streak after a completion at `now`
///
/// Completing again inside the current period leaves the streak alone; the
/// next period extends it; anything later starts over.
fn next_streak(habit: &Habit, now: DateTime<Utc>) -> u32 {
    let period = habit.frequency.period_secs();
    match habit.last_completed_at {
        None => 1,
        Some(last) => {
            let elapsed = (now - last).num_seconds();
            if elapsed < period {
                habit.current_streak.max(1)
            } else if elapsed < 2 * period {
                habit.current_streak + 1
            } else {
                1
            }
        }
    }
}

#[async_trait]
impl HabitRepository for InMemoryHost {
    async fn create_habit(&self, input: NewHabit) -> Result<Habit> {
        require_text("name", &input.name)?;
        let target = input.target_per_period.unwrap_or(1);
        if target == 0 {
            return Err(Error::invalid_argument("target_per_period must be at least 1"));
        }
        let now = self.now();
        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            frequency: input.frequency.unwrap_or_default(),
            target_per_period: target,
            completion_count: 0,
            current_streak: 0,
            last_completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.habits.insert(
            habit.id.clone(),
            Stored {
                seq: self.next_seq(),
                record: habit.clone(),
            },
        );
        self.record(
            ActivityAction::Created,
            EntityKind::Habit,
            &habit.id,
            format!("Created habit \"{}\"", habit.name),
        );
        Ok(habit)
    }

    async fn list_habits(&self, filter: HabitFilter) -> Result<Vec<Habit>> {
        Ok(newest_first(
            &self.habits,
            |habit| filter.frequency.is_none_or(|f| habit.frequency == f),
            filter.limit,
        ))
    }

    async fn update_habit(&self, id: &str, patch: HabitPatch) -> Result<Habit> {
        if let Some(name) = &patch.name {
            require_text("name", name)?;
        }
        if patch.target_per_period == Some(0) {
            return Err(Error::invalid_argument("target_per_period must be at least 1"));
        }
        let updated = {
            let mut entry = self.habits.get_mut(id).ok_or_else(|| not_found("habit", id))?;
            let habit = &mut entry.record;
            if let Some(name) = patch.name {
                habit.name = name;
            }
            if patch.description.is_some() {
                habit.description = patch.description;
            }
            if let Some(frequency) = patch.frequency {
                habit.frequency = frequency;
            }
            if let Some(target) = patch.target_per_period {
                habit.target_per_period = target;
            }
            habit.updated_at = self.now();
            habit.clone()
        };
        self.record(
            ActivityAction::Updated,
            EntityKind::Habit,
            id,
            format!("Updated habit \"{}\"", updated.name),
        );
        Ok(updated)
    }

    async fn delete_habit(&self, id: &str) -> Result<()> {
        let (_, removed) = self.habits.remove(id).ok_or_else(|| not_found("habit", id))?;
        self.record(
            ActivityAction::Deleted,
            EntityKind::Habit,
            id,
            format!("Deleted habit \"{}\"", removed.record.name),
        );
        Ok(())
    }

    async fn log_completion(&self, id: &str) -> Result<Habit> {
        let now = self.now();
        let updated = {
            let mut entry = self.habits.get_mut(id).ok_or_else(|| not_found("habit", id))?;
            let habit = &mut entry.record;
            habit.current_streak = next_streak(habit, now);
            habit.completion_count += 1;
            habit.last_completed_at = Some(now);
            habit.updated_at = now;
            habit.clone()
        };
        self.record(
            ActivityAction::Completed,
            EntityKind::Habit,
            id,
            format!(
                "Completed habit \"{}\" (streak {})",
                updated.name, updated.current_streak
            ),
        );
        Ok(updated)
    }
}

#[async_trait]
impl NoteRepository for InMemoryHost {
    async fn create_note(&self, input: NewNote) -> Result<Note> {
        require_text("title", &input.title)?;
        let now = self.now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            content: input.content,
            tags: input.tags.unwrap_or_default(),
            pinned: input.pinned.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        self.notes.insert(
            note.id.clone(),
            Stored {
                seq: self.next_seq(),
                record: note.clone(),
            },
        );
        self.record(
            ActivityAction::Created,
            EntityKind::Note,
            &note.id,
            format!("Created note \"{}\"", note.title),
        );
        Ok(note)
    }

    async fn list_notes(&self, filter: NoteFilter) -> Result<Vec<Note>> {
        let query = filter.query.as_ref().map(|q| q.to_lowercase());
        let mut notes = newest_first(
            &self.notes,
            |note| {
                filter.tag.as_ref().is_none_or(|t| note.tags.contains(t))
                    && query.as_ref().is_none_or(|q| {
                        note.title.to_lowercase().contains(q)
                            || note.content.to_lowercase().contains(q)
                    })
            },
            None,
        );
        // Pinned notes first; the sort is stable so recency order holds within each group.
        notes.sort_by_key(|note| !note.pinned);
        notes.truncate(filter.limit.unwrap_or(usize::MAX));
        Ok(notes)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Note> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }
        let updated = {
            let mut entry = self.notes.get_mut(id).ok_or_else(|| not_found("note", id))?;
            let note = &mut entry.record;
            if let Some(title) = patch.title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content;
            }
            if let Some(tags) = patch.tags {
                note.tags = tags;
            }
            if let Some(pinned) = patch.pinned {
                note.pinned = pinned;
            }
            note.updated_at = self.now();
            note.clone()
        };
        self.record(
            ActivityAction::Updated,
            EntityKind::Note,
            id,
            format!("Updated note \"{}\"", updated.title),
        );
        Ok(updated)
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        let (_, removed) = self.notes.remove(id).ok_or_else(|| not_found("note", id))?;
        self.record(
            ActivityAction::Deleted,
            EntityKind::Note,
            id,
            format!("Deleted note \"{}\"", removed.record.title),
        );
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryHost {
    async fn create_question(&self, input: NewQuestion) -> Result<Question> {
        require_text("question", &input.question)?;
        let now = self.now();
        let answered_at = input.answer.as_ref().map(|_| now);
        let question = Question {
            id: Uuid::new_v4().to_string(),
            question: input.question,
            answer: input.answer,
            tags: input.tags.unwrap_or_default(),
            answered_at,
            created_at: now,
            updated_at: now,
        };
        self.questions.insert(
            question.id.clone(),
            Stored {
                seq: self.next_seq(),
                record: question.clone(),
            },
        );
        self.record(
            ActivityAction::Created,
            EntityKind::Question,
            &question.id,
            format!("Asked \"{}\"", question.question),
        );
        Ok(question)
    }

    async fn list_questions(&self, filter: QuestionFilter) -> Result<Vec<Question>> {
        Ok(newest_first(
            &self.questions,
            |question| {
                filter
                    .answered
                    .is_none_or(|answered| question.answer.is_some() == answered)
                    && filter.tag.as_ref().is_none_or(|t| question.tags.contains(t))
            },
            filter.limit,
        ))
    }

    async fn answer_question(&self, id: &str, answer: String) -> Result<Question> {
        require_text("answer", &answer)?;
        let now = self.now();
        let updated = {
            let mut entry = self
                .questions
                .get_mut(id)
                .ok_or_else(|| not_found("question", id))?;
            let question = &mut entry.record;
            question.answer = Some(answer);
            question.answered_at = Some(now);
            question.updated_at = now;
            question.clone()
        };
        self.record(
            ActivityAction::Answered,
            EntityKind::Question,
            id,
            format!("Answered \"{}\"", updated.question),
        );
        Ok(updated)
    }

    async fn delete_question(&self, id: &str) -> Result<()> {
        let (_, removed) = self
            .questions
            .remove(id)
            .ok_or_else(|| not_found("question", id))?;
        self.record(
            ActivityAction::Deleted,
            EntityKind::Question,
            id,
            format!("Deleted question \"{}\"", removed.record.question),
        );
        Ok(())
    }
}

#[async_trait]
impl ActivityLog for InMemoryHost {
    async fn list_activity(&self, filter: ActivityFilter) -> Result<Vec<ActivityEntry>> {
        let log = self.activity.read().unwrap_or_else(PoisonError::into_inner);
        Ok(log
            .iter()
            .rev()
            .filter(|entry| filter.entity.is_none_or(|kind| entry.entity == kind))
            .filter(|entry| {
                filter
                    .entity_id
                    .as_ref()
                    .is_none_or(|id| &entry.entity_id == id)
            })
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
