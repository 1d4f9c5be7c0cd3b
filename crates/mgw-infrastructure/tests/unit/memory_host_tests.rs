//! In-memory host repository tests

use std::sync::Arc;
use std::time::Duration;

use mgw_domain::entities::{
    ActivityAction, ActivityFilter, EntityKind, HabitFrequency, NewHabit, NewNote, NewProject,
    NewQuestion, NewTask, NoteFilter, NotePatch, ProjectFilter, ProjectPatch, QuestionFilter,
    TaskFilter, TaskPatch, TaskStatus,
};
use mgw_domain::error::Error;
use mgw_domain::ports::{
    ActivityLog, HabitRepository, ManualClock, NoteRepository, ProjectRepository,
    QuestionRepository, TaskRepository,
};
use mgw_infrastructure::host::InMemoryHost;

fn host() -> (InMemoryHost, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    (InMemoryHost::new(clock.clone()), clock)
}

fn new_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        ..NewTask::default()
    }
}

#[tokio::test]
async fn test_task_lifecycle() {
    let (host, _) = host();

    let task = host.create_task(new_task("Write report")).await.unwrap();
    assert_eq!(task.status, TaskStatus::Todo);
    assert_eq!(task.priority, 3);

    let updated = host
        .update_task(
            &task.id,
            TaskPatch {
                status: Some(TaskStatus::Done),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::Done);
    assert_eq!(updated.title, "Write report");

    host.delete_task(&task.id).await.unwrap();
    assert!(host.list_tasks(TaskFilter::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_records_are_not_found() {
    let (host, _) = host();
    let err = host
        .update_task("missing", TaskPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(matches!(
        host.delete_note("missing").await.unwrap_err(),
        Error::NotFound { .. }
    ));
    assert!(matches!(
        host.log_completion("missing").await.unwrap_err(),
        Error::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_rejected_input_is_invalid_argument() {
    let (host, _) = host();
    let err = host.create_task(new_task("   ")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = host
        .create_task(NewTask {
            priority: Some(9),
            ..new_task("Too urgent")
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_failed_update_leaves_record_untouched() {
    let (host, _) = host();
    let task = host.create_task(new_task("Keep me")).await.unwrap();
    let result = host
        .update_task(
            &task.id,
            TaskPatch {
                title: Some("Renamed".to_string()),
                priority: Some(0),
                ..TaskPatch::default()
            },
        )
        .await;
    assert!(result.is_err());
    let tasks = host.list_tasks(TaskFilter::default()).await.unwrap();
    assert_eq!(tasks[0].title, "Keep me");
}

#[tokio::test]
async fn test_tasks_list_newest_first_with_filters() {
    let (host, _) = host();
    let project = host
        .create_project(NewProject {
            name: "Home".to_string(),
            ..NewProject::default()
        })
        .await
        .unwrap();

    host.create_task(new_task("first")).await.unwrap();
    host.create_task(NewTask {
        project_id: Some(project.id.clone()),
        tags: Some(vec!["errand".to_string()]),
        ..new_task("second")
    })
    .await
    .unwrap();
    host.create_task(new_task("third")).await.unwrap();

    let all = host.list_tasks(TaskFilter::default()).await.unwrap();
    let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["third", "second", "first"]);

    let by_project = host
        .list_tasks(TaskFilter {
            project_id: Some(project.id.clone()),
            ..TaskFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_project.len(), 1);
    assert_eq!(by_project[0].title, "second");

    let limited = host
        .list_tasks(TaskFilter {
            limit: Some(2),
            ..TaskFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);
}

#[tokio::test]
async fn test_deleting_project_unlinks_tasks() {
    let (host, _) = host();
    let project = host
        .create_project(NewProject {
            name: "Garden".to_string(),
            ..NewProject::default()
        })
        .await
        .unwrap();
    let task = host
        .create_task(NewTask {
            project_id: Some(project.id.clone()),
            ..new_task("Plant")
        })
        .await
        .unwrap();

    host.delete_project(&project.id).await.unwrap();

    let tasks = host.list_tasks(TaskFilter::default()).await.unwrap();
    assert_eq!(tasks[0].id, task.id);
    assert!(tasks[0].project_id.is_none());
}

#[tokio::test]
async fn test_archived_projects_hidden_by_default() {
    let (host, _) = host();
    let project = host
        .create_project(NewProject {
            name: "Old".to_string(),
            ..NewProject::default()
        })
        .await
        .unwrap();
    host.update_project(
        &project.id,
        ProjectPatch {
            archived: Some(true),
            ..ProjectPatch::default()
        },
    )
    .await
    .unwrap();

    assert!(
        host.list_projects(ProjectFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    let all = host
        .list_projects(ProjectFilter {
            include_archived: true,
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_habit_streaks_follow_the_clock() {
    let (host, clock) = host();
    let habit = host
        .create_habit(NewHabit {
            name: "Stretch".to_string(),
            frequency: Some(HabitFrequency::Daily),
            ..NewHabit::default()
        })
        .await
        .unwrap();

    let habit_after = host.log_completion(&habit.id).await.unwrap();
    assert_eq!(habit_after.current_streak, 1);

    // Same day: count grows, streak does not.
    clock.advance(Duration::from_secs(3_600));
    let habit_after = host.log_completion(&habit.id).await.unwrap();
    assert_eq!(habit_after.completion_count, 2);
    assert_eq!(habit_after.current_streak, 1);

    clock.advance(Duration::from_secs(86_400));
    let habit_after = host.log_completion(&habit.id).await.unwrap();
    assert_eq!(habit_after.current_streak, 2);

    // Skipped days reset the streak.
    clock.advance(Duration::from_secs(5 * 86_400));
    let habit_after = host.log_completion(&habit.id).await.unwrap();
    assert_eq!(habit_after.current_streak, 1);
    assert_eq!(habit_after.completion_count, 4);
}

#[tokio::test]
async fn test_notes_pinned_first_and_searchable() {
    let (host, _) = host();
    let pinned = host
        .create_note(NewNote {
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            ..NewNote::default()
        })
        .await
        .unwrap();
    host.create_note(NewNote {
        title: "Ideas".to_string(),
        content: "Build a birdhouse".to_string(),
        ..NewNote::default()
    })
    .await
    .unwrap();
    host.update_note(
        &pinned.id,
        NotePatch {
            pinned: Some(true),
            ..NotePatch::default()
        },
    )
    .await
    .unwrap();

    let notes = host.list_notes(NoteFilter::default()).await.unwrap();
    assert_eq!(notes[0].id, pinned.id);

    let found = host
        .list_notes(NoteFilter {
            query: Some("BIRD".to_string()),
            ..NoteFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Ideas");
}

#[tokio::test]
async fn test_answering_questions() {
    let (host, _) = host();
    let question = host
        .create_question(NewQuestion {
            question: "Where are the keys?".to_string(),
            ..NewQuestion::default()
        })
        .await
        .unwrap();
    assert!(question.answer.is_none());

    let unanswered = QuestionFilter {
        answered: Some(false),
        ..QuestionFilter::default()
    };
    assert_eq!(host.list_questions(unanswered.clone()).await.unwrap().len(), 1);

    let answered = host
        .answer_question(&question.id, "On the hook".to_string())
        .await
        .unwrap();
    assert_eq!(answered.answer.as_deref(), Some("On the hook"));
    assert!(answered.answered_at.is_some());
    assert!(host.list_questions(unanswered).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mutations_append_activity() {
    let (host, _) = host();
    let task = host.create_task(new_task("Track me")).await.unwrap();
    host.update_task(&task.id, TaskPatch::default()).await.unwrap();
    host.delete_task(&task.id).await.unwrap();
    host.create_note(NewNote {
        title: "Other".to_string(),
        ..NewNote::default()
    })
    .await
    .unwrap();

    let for_task = host
        .list_activity(ActivityFilter {
            entity_id: Some(task.id.clone()),
            ..ActivityFilter::default()
        })
        .await
        .unwrap();
    let actions: Vec<_> = for_task.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        [
            ActivityAction::Deleted,
            ActivityAction::Updated,
            ActivityAction::Created
        ]
    );

    let notes_only = host
        .list_activity(ActivityFilter {
            entity: Some(EntityKind::Note),
            ..ActivityFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(notes_only.len(), 1);

    // Failed mutations leave no trace.
    let _ = host.delete_task(&task.id).await;
    let all = host.list_activity(ActivityFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);
}
