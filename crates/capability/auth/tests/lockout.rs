use chrono::{Duration, Utc};
use ems_auth::{AuthError, LoginGate, attempt_key};
use ems_storage::{InMemoryLoginAttemptStore, LoginAttemptStore};
use std::sync::Arc;

fn gate() -> (LoginGate, Arc<InMemoryLoginAttemptStore>) {
    let store = Arc::new(InMemoryLoginAttemptStore::new());
    (LoginGate::new(store.clone(), 5, 30), store)
}

#[test]
fn key_combines_username_and_address() {
    assert_eq!(attempt_key("alice", "10.0.0.1"), "alice@10.0.0.1");
}

#[tokio::test]
async fn five_failures_lock_on_the_next_check() {
    let (gate, _) = gate();
    let key = attempt_key("alice", "10.0.0.1");
    for _ in 0..5 {
        gate.check_attempts(&key).await.expect("permitted");
        gate.record_attempt(&key, false).await.expect("record");
    }

    assert!(matches!(
        gate.check_attempts(&key).await,
        Err(AuthError::MaxAttemptsExceeded { lockout_minutes: 30 })
    ));
    match gate.check_attempts(&key).await {
        Err(AuthError::AccountLocked { remaining_minutes }) => {
            assert!((1..=30).contains(&remaining_minutes));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn remaining_minutes_never_drop_below_one() {
    let (gate, store) = gate();
    let key = attempt_key("alice", "10.0.0.1");
    let now = Utc::now();
    store
        .lock_until(&key, now + Duration::seconds(20))
        .await
        .expect("lock");
    assert!(matches!(
        gate.check_attempts_at(&key, now).await,
        Err(AuthError::AccountLocked { remaining_minutes: 1 })
    ));
}

#[tokio::test]
async fn expired_lockout_starts_fresh() {
    let (gate, store) = gate();
    let key = attempt_key("alice", "10.0.0.1");
    for _ in 0..5 {
        gate.record_attempt(&key, false).await.expect("record");
    }
    let now = Utc::now();
    assert!(gate.check_attempts_at(&key, now).await.is_err());

    let later = now + Duration::minutes(31);
    gate.check_attempts_at(&key, later).await.expect("permitted");
    assert_eq!(store.get(&key).await.expect("get").failures, 0);
}

#[tokio::test]
async fn success_clears_the_count() {
    let (gate, store) = gate();
    let key = attempt_key("alice", "10.0.0.1");
    for _ in 0..4 {
        gate.record_attempt(&key, false).await.expect("record");
    }
    gate.record_attempt(&key, true).await.expect("record");
    assert_eq!(store.get(&key).await.expect("get").failures, 0);
}
