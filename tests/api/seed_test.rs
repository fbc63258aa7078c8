//! Startup seeding against the in-memory store

use super::{test_config, ADMIN_EMAIL};
use task_manager::migration;
use task_manager::server::MemoryAppState;
use task_manager::state::HasServices;

#[tokio::test]
async fn test_seed_fresh_store() {
    let state = MemoryAppState::in_memory(test_config()).unwrap();

    let report = migration::seed(&state).await.unwrap();

    assert_eq!(report.task_statuses, 5);
    assert_eq!(report.labels, 2);
    assert!(report.admin_created);

    let admin = state
        .user_service()
        .find_by_email(ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(admin.is_admin());
}

#[tokio::test]
async fn test_seed_is_idempotent() {
    let state = MemoryAppState::in_memory(test_config()).unwrap();
    migration::seed(&state).await.unwrap();

    let report = migration::seed(&state).await.unwrap();

    assert_eq!(report.task_statuses, 0);
    assert_eq!(report.labels, 0);
    assert!(!report.admin_created);
    assert_eq!(state.task_status_service().list().await.unwrap().len(), 5);
    assert_eq!(state.label_service().list().await.unwrap().len(), 2);
    assert_eq!(state.user_service().list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_seed_without_admin_config() {
    let mut config = test_config();
    config.admin = None;
    let state = MemoryAppState::in_memory(config).unwrap();

    let report = migration::seed(&state).await.unwrap();

    assert!(!report.admin_created);
    assert!(state.user_service().list().await.unwrap().is_empty());
}
