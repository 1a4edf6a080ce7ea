use domain::{AlarmStatus, DEFAULT_ROLE, Principal, Role};

#[test]
fn principal_builds() {
    let principal = Principal::new("U1", "alice", vec!["MAINTENANCE".to_string()]);

    assert_eq!(principal.user_id, "U1");
    assert_eq!(principal.username, "alice");
    assert!(principal.has_role(Role::Maintenance));
    assert!(!principal.has_role(Role::Admin));
}

#[test]
fn any_role_intersects() {
    let principal = Principal::new("U1", "alice", vec!["USER".to_string()]);

    assert!(!principal.has_any_role(&[Role::Admin, Role::Maintenance]));
    assert!(principal.has_any_role(&[Role::Admin, Role::User]));
    assert!(principal.has_any_role(&[]));
}

#[test]
fn role_codes_round_trip_and_ids_are_seed_order() {
    for role in Role::ALL {
        assert_eq!(Role::from_code(role.code()), Some(role));
    }
    assert_eq!(Role::Admin.role_id(), 1);
    assert_eq!(Role::User.role_id(), 7);
    assert_eq!(Role::from_code("SYSTEM_ADMIN"), None);
}

#[test]
fn alarm_status_uses_stored_labels() {
    assert_eq!(AlarmStatus::Unhandled.as_str(), "未处理");
    assert_eq!(AlarmStatus::parse("已结案"), Some(AlarmStatus::Closed));
    assert_eq!(AlarmStatus::parse("closed"), None);
    assert!(AlarmStatus::Handled.is_terminal());
    assert!(!AlarmStatus::InProgress.is_terminal());
}

#[test]
fn registration_default_role_is_plain_user() {
    assert_eq!(DEFAULT_ROLE, Role::User);
    assert_eq!(DEFAULT_ROLE.code(), "USER");
}
