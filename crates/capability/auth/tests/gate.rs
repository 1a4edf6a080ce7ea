use domain::Role;
use ems_auth::{AccessError, JwtManager, authorize};

fn token(jwt: &JwtManager, roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|role| role.to_string()).collect();
    jwt.generate_session_token("U1", "alice", &roles)
        .expect("token")
        .token
}

#[test]
fn missing_or_blank_token_is_rejected() {
    let jwt = JwtManager::new("secret", 1800);
    assert_eq!(authorize(&jwt, None, &[]), Err(AccessError::TokenMissing));
    assert_eq!(authorize(&jwt, Some("  "), &[]), Err(AccessError::TokenMissing));
}

#[test]
fn invalid_token_is_rejected() {
    let jwt = JwtManager::new("secret", 1800);
    assert_eq!(
        authorize(&jwt, Some("garbage"), &[]),
        Err(AccessError::TokenInvalid)
    );
}

#[test]
fn empty_requirement_admits_any_principal() {
    let jwt = JwtManager::new("secret", 1800);
    let token = token(&jwt, &["USER"]);
    let principal = authorize(&jwt, Some(&token), &[]).expect("principal");
    assert_eq!(principal.username, "alice");
}

#[test]
fn roles_must_intersect_requirement() {
    let jwt = JwtManager::new("secret", 1800);
    let maintainer = token(&jwt, &["MAINTENANCE", "USER"]);
    let required = [Role::Admin, Role::Maintenance];
    assert!(authorize(&jwt, Some(&maintainer), &required).is_ok());

    let user = token(&jwt, &["USER"]);
    assert_eq!(
        authorize(&jwt, Some(&user), &required),
        Err(AccessError::Forbidden)
    );
}
