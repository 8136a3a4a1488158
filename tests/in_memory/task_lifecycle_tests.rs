//! In-memory integration tests for task lifecycle operations.

use super::helpers::{TestService, create_titled, service, user};
use chrono::{Duration, Utc};
use rstest::rstest;
use taskmanager::task::{
    domain::{TaskDomainError, TaskPriority, TaskStatus},
    services::{
        CreateTaskRequest, TaskLifecycleError, UpdateTaskRequest, UpdateTaskStatusRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_round_trip(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let due = Utc::now() + Duration::days(3);
    let created = service
        .create_task(
            &alice,
            CreateTaskRequest::new("Prepare release notes")
                .with_description("Collect merged changes")
                .with_priority("high")
                .with_due_date(due),
        )
        .await?;
    eyre::ensure!(created.priority() == TaskPriority::High, "priority not parsed");
    eyre::ensure!(created.due_date() == Some(due), "due date not kept");

    let edited = service
        .update_task(
            &alice,
            UpdateTaskRequest::new(created.id(), "Publish release notes")
                .with_description("Post to the changelog")
                .with_status("IN_PROGRESS")
                .with_priority("HIGH")
                .with_due_date(due),
        )
        .await?;
    eyre::ensure!(edited.status() == TaskStatus::InProgress, "status not applied");
    eyre::ensure!(edited.updated_at() >= created.updated_at(), "updated_at moved back");

    let completed = service
        .update_status(&alice, UpdateTaskStatusRequest::new(created.id(), "COMPLETED"))
        .await?;
    let archived = service.archive_task(&alice, created.id()).await?;
    eyre::ensure!(archived.is_archived(), "task not archived");
    eyre::ensure!(
        archived.status() == completed.status(),
        "archive changed the status"
    );

    let deleted = service.delete_task(&alice, created.id()).await?;
    eyre::ensure!(deleted.is_deleted(), "task not deleted");
    eyre::ensure!(deleted.is_archived(), "delete cleared the archive flag");

    let restored = service.restore_task(&alice, created.id()).await?;
    eyre::ensure!(!restored.is_deleted(), "task still deleted");
    eyre::ensure!(restored.is_archived(), "restore cleared the archive flag");
    eyre::ensure!(
        restored.created_at() == created.created_at(),
        "created_at changed"
    );

    service.permanently_delete_task(&alice, created.id()).await?;
    let found = service.find_task(&alice, created.id()).await?;
    eyre::ensure!(found.is_none(), "task survived permanent deletion");
    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test(flavor = "multi_thread")]
async fn blank_titles_are_rejected(service: TestService, #[case] title: &str) {
    let result = service
        .create_task(&user("alice"), CreateTaskRequest::new(title))
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Validation(TaskDomainError::EmptyTitle))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlong_description_is_rejected(service: TestService) {
    let result = service
        .create_task(
            &user("alice"),
            CreateTaskRequest::new("Verbose").with_description("x".repeat(1001)),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Validation(TaskDomainError::DescriptionTooLong { max: 1000 }))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_can_still_be_archived(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let task = create_titled(&service, &alice, "Hidden").await?;
    service.delete_task(&alice, task.id()).await?;

    let archived = service.archive_task(&alice, task.id()).await?;

    eyre::ensure!(archived.is_archived() && archived.is_deleted(), "markers lost");
    let listed = service.list_archived(&alice).await?;
    eyre::ensure!(listed.is_empty(), "deleted task listed as archived");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_twice_restamps_the_marker(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let task = create_titled(&service, &alice, "Twice").await?;

    let first = service.delete_task(&alice, task.id()).await?;
    let second = service.delete_task(&alice, task.id()).await?;

    eyre::ensure!(second.is_deleted(), "task no longer deleted");
    eyre::ensure!(
        second.deleted_at() >= first.deleted_at(),
        "deletion marker moved back"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_is_not_found(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let ghost = create_titled(&service, &alice, "Ghost").await?;
    service.permanently_delete_task(&alice, ghost.id()).await?;

    let restore = service.restore_task(&alice, ghost.id()).await;
    let archive = service.archive_task(&alice, ghost.id()).await;

    eyre::ensure!(
        matches!(restore, Err(TaskLifecycleError::NotFound(_))),
        "restore of missing task: {restore:?}"
    );
    eyre::ensure!(
        matches!(archive, Err(TaskLifecycleError::NotFound(_))),
        "archive of missing task: {archive:?}"
    );
    Ok(())
}
