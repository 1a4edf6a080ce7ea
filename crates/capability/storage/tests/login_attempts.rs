use chrono::{Duration, Utc};
use ems_storage::{InMemoryLoginAttemptStore, LoginAttemptState, LoginAttemptStore};

#[tokio::test]
async fn failures_accumulate_and_survive_lock() {
    let store = InMemoryLoginAttemptStore::new();
    assert_eq!(
        store.get("alice@10.0.0.1").await.expect("get"),
        LoginAttemptState::default()
    );
    assert_eq!(store.record_failure("alice@10.0.0.1").await.expect("fail"), 1);
    assert_eq!(store.record_failure("alice@10.0.0.1").await.expect("fail"), 2);

    let until = Utc::now() + Duration::minutes(30);
    store.lock_until("alice@10.0.0.1", until).await.expect("lock");
    assert_eq!(store.record_failure("alice@10.0.0.1").await.expect("fail"), 3);

    let state = store.get("alice@10.0.0.1").await.expect("get");
    assert_eq!(state.failures, 3);
    assert_eq!(state.locked_until, Some(until));
}

#[tokio::test]
async fn keys_are_independent_and_clearable() {
    let store = InMemoryLoginAttemptStore::new();
    store.record_failure("alice@10.0.0.1").await.expect("fail");
    store.record_failure("alice@10.0.0.2").await.expect("fail");
    store.clear("alice@10.0.0.1").await.expect("clear");

    assert_eq!(store.get("alice@10.0.0.1").await.expect("get").failures, 0);
    assert_eq!(store.get("alice@10.0.0.2").await.expect("get").failures, 1);
}
