//! In-memory integration tests for ownership isolation under each tenancy
//! mode.

use std::sync::Arc;

use super::helpers::{TestService, create_titled, service, shared_service, titles, user};
use rstest::rstest;
use taskmanager::task::{
    domain::{Requester, TaskStatus},
    services::TaskLifecycleError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn users_only_see_their_own_tasks(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let bob = user("bob");
    create_titled(&service, &alice, "Alice's plan").await?;
    create_titled(&service, &bob, "Bob's plan").await?;

    eyre::ensure!(
        titles(&service.list_tasks(&alice).await?) == vec!["Alice's plan".to_owned()],
        "alice sees foreign tasks"
    );
    eyre::ensure!(
        titles(&service.search_tasks(&bob, "plan").await?) == vec!["Bob's plan".to_owned()],
        "bob's search leaks foreign tasks"
    );
    eyre::ensure!(
        service.count_by_status(&alice, TaskStatus::Todo).await? == 1,
        "count includes foreign tasks"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_tenant_shares_every_task(shared_service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let bob = user("bob");
    let task = create_titled(&shared_service, &alice, "Shared").await?;

    let edited = shared_service.archive_task(&bob, task.id()).await?;
    shared_service.delete_task(&Requester::Anonymous, task.id()).await?;
    let restored = shared_service.restore_task(&bob, task.id()).await?;

    eyre::ensure!(edited.owner().is_none(), "single-tenant tasks carry no owner");
    eyre::ensure!(!restored.is_deleted(), "restore failed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_delete_keeps_other_users_tasks(service: TestService) -> Result<(), eyre::Report> {
    let alice = user("alice");
    let bob = user("bob");
    for title in ["a", "b", "c"] {
        create_titled(&service, &alice, title).await?;
    }
    create_titled(&service, &bob, "kept").await?;

    let affected = service.delete_all_tasks(&alice).await?;

    eyre::ensure!(affected == 3, "unexpected count {affected}");
    eyre::ensure!(service.list_tasks(&alice).await?.is_empty(), "alice has live tasks");
    eyre::ensure!(service.list_deleted(&alice).await?.len() == 3, "deleted tasks missing");
    eyre::ensure!(service.list_tasks(&bob).await?.len() == 1, "bob lost tasks");

    let again = service.delete_all_tasks(&alice).await?;
    eyre::ensure!(again == 0, "second bulk delete touched {again} tasks");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anonymous_requests_fail_when_multi_tenant(service: TestService) {
    let result = service.delete_all_tasks(&Requester::Anonymous).await;
    assert!(matches!(result, Err(TaskLifecycleError::Unauthenticated)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creation_keeps_every_task(service: TestService) -> Result<(), eyre::Report> {
    let shared = Arc::new(service);
    let alice = user("alice");
    let mut handles = Vec::new();
    for index in 0..16 {
        let worker = Arc::clone(&shared);
        let requester = alice.clone();
        handles.push(tokio::spawn(async move {
            create_titled(&worker, &requester, &format!("Parallel {index}")).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let listed = shared.list_tasks(&alice).await?;
    eyre::ensure!(listed.len() == 16, "expected 16 tasks, found {}", listed.len());
    Ok(())
}
