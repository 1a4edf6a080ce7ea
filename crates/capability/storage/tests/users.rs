use domain::Role;
use ems_storage::{
    InMemoryRoleStore, InMemoryUserStore, RoleRecord, RoleStore, UserCreate, UserProfileUpdate,
    UserStore,
};

fn user(user_id: &str, username: &str, email: &str) -> UserCreate {
    UserCreate {
        user_id: user_id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        phone: None,
        full_name: None,
        password_hash: "digest:salt:sha256".to_string(),
        roles: vec!["USER".to_string()],
    }
}

#[tokio::test]
async fn create_and_find_user() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("U1", "alice", "alice@example.com"))
        .await
        .expect("create");

    let by_name = store
        .find_by_username("alice")
        .await
        .expect("query")
        .expect("alice");
    assert_eq!(by_name.user_id, "U1");
    assert_eq!(by_name.roles, vec!["USER".to_string()]);
    assert!(store
        .find_by_email("alice@example.com")
        .await
        .expect("query")
        .is_some());
    assert!(store.find_by_user_id("U2").await.expect("query").is_none());
}

#[tokio::test]
async fn username_and_email_are_unique() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("U1", "alice", "alice@example.com"))
        .await
        .expect("create");
    assert!(store
        .create_user(user("U2", "alice", "other@example.com"))
        .await
        .is_err());
    assert!(store
        .create_user(user("U3", "bob", "alice@example.com"))
        .await
        .is_err());
}

#[tokio::test]
async fn profile_update_touches_only_given_fields() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("U1", "alice", "alice@example.com"))
        .await
        .expect("create");
    let updated = store
        .update_profile(
            "U1",
            UserProfileUpdate {
                phone: Some("13800000000".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update")
        .expect("user");
    assert_eq!(updated.phone.as_deref(), Some("13800000000"));
    assert_eq!(updated.email, "alice@example.com");
    assert_eq!(updated.username, "alice");

    assert!(store
        .update_profile("missing", UserProfileUpdate::default())
        .await
        .expect("update")
        .is_none());
}

#[tokio::test]
async fn password_hash_replacement_and_delete() {
    let store = InMemoryUserStore::new();
    store
        .create_user(user("U1", "alice", "alice@example.com"))
        .await
        .expect("create");
    assert!(store
        .update_password_hash("U1", "new:salt:sha256")
        .await
        .expect("update"));
    let found = store
        .find_by_user_id("U1")
        .await
        .expect("query")
        .expect("user");
    assert_eq!(found.password_hash, "new:salt:sha256");

    assert!(store.delete_user("U1").await.expect("delete"));
    assert!(store.list_users().await.expect("list").is_empty());
}

#[tokio::test]
async fn roles_seed_only_once() {
    let store = InMemoryRoleStore::new();
    let seed: Vec<RoleRecord> = Role::ALL.into_iter().map(RoleRecord::from).collect();
    assert_eq!(
        store.seed_roles_if_empty(seed.clone()).await.expect("seed"),
        7
    );
    assert_eq!(store.seed_roles_if_empty(seed).await.expect("seed"), 0);

    let roles = store.list_roles().await.expect("list");
    assert_eq!(roles.len(), 7);
    assert_eq!(roles[0].role_code, "ADMIN");
    assert_eq!(roles[6].role_code, "USER");
}
