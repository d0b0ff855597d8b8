// =================================
// tests/unit/session_layer_tests.rs
// =================================
//! Session layers through the public API
use sessiongate_lib::{
    auth::{ExpiringSessions, ManualClock, PersistentSessions, SessionResolver, SessionStore},
    config::SessionDuration,
    models::UserSession,
    storage::{FileObjectStore, ObjectStore},
};
use std::sync::Arc;
use tempfile::TempDir;

fn expiring(duration: u64, clock: &ManualClock) -> ExpiringSessions {
    ExpiringSessions::with_clock(
        SessionStore::new(),
        SessionDuration::from_secs(duration),
        Arc::new(clock.clone()),
    )
}

async fn persistent(temp_dir: &TempDir, duration: u64, clock: &ManualClock) -> PersistentSessions {
    let records = Arc::new(FileObjectStore::<UserSession>::new(temp_dir.path()).unwrap());
    records.load_all().await.unwrap();
    PersistentSessions::new(expiring(duration, clock), records)
}

#[tokio::test]
async fn test_every_layer_rejects_absent_input() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();
    let layers: Vec<Box<dyn SessionResolver>> = vec![
        Box::new(SessionStore::new()),
        Box::new(expiring(60, &clock)),
        Box::new(persistent(&temp_dir, 60, &clock).await),
    ];

    for layer in &layers {
        assert_eq!(layer.create(None).await, None);
        assert_eq!(layer.lookup(None).await, None);
        assert_eq!(layer.lookup(Some("not-a-session")).await, None);
        assert!(!layer.destroy("not-a-session").await);
    }
}

#[tokio::test]
async fn test_every_layer_round_trips_and_destroys() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();
    let layers: Vec<Box<dyn SessionResolver>> = vec![
        Box::new(SessionStore::new()),
        Box::new(expiring(60, &clock)),
        Box::new(persistent(&temp_dir, 60, &clock).await),
    ];

    for layer in &layers {
        let session_id = layer.create(Some("user-1")).await.unwrap();
        assert_eq!(layer.lookup(Some(&session_id)).await.as_deref(), Some("user-1"));
        assert!(layer.destroy(&session_id).await);
        assert_eq!(layer.lookup(Some(&session_id)).await, None);
    }
}

#[tokio::test]
async fn test_persistent_sessions_survive_restart_and_expire() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();

    let session_id = {
        let sessions = persistent(&temp_dir, 10, &clock).await;
        sessions.create(Some("user-1")).await.unwrap()
    };

    let restarted = persistent(&temp_dir, 10, &clock).await;
    clock.advance_secs(10);
    assert_eq!(restarted.lookup(Some(&session_id)).await.as_deref(), Some("user-1"));

    clock.advance_secs(1);
    assert_eq!(restarted.lookup(Some(&session_id)).await, None);
}

#[tokio::test]
async fn test_destroyed_persistent_session_stays_gone_after_restart() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();

    let sessions = persistent(&temp_dir, 0, &clock).await;
    let session_id = sessions.create(Some("user-1")).await.unwrap();
    assert!(sessions.destroy(&session_id).await);

    let restarted = persistent(&temp_dir, 0, &clock).await;
    assert_eq!(restarted.lookup(Some(&session_id)).await, None);
}
