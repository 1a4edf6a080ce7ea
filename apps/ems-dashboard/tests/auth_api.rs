mod common;

use axum::http::{StatusCode, header};
use common::{PASSWORD, spawn_app};
use domain::Role;
use serde_json::json;

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "password": PASSWORD,
        "email": format!("{username}@example.com"),
        "fullName": "测试用户"
    })
}

#[tokio::test]
async fn health_endpoints_respond_without_token() {
    let app = spawn_app().await;
    for uri in ["/health", "/livez", "/readyz", "/api/health"] {
        let response = app.send("GET", uri, None, None).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
        assert_eq!(response.body["ok"], true);
    }
}

#[tokio::test]
async fn responses_carry_request_ids() {
    let app = spawn_app().await;
    let response = app.send("GET", "/health", None, None).await;
    assert!(response.headers.contains_key("x-request-id"));
    assert!(response.headers.contains_key("x-trace-id"));
}

#[tokio::test]
async fn register_login_profile_flow() {
    let app = spawn_app().await;

    let response = app
        .send("POST", "/api/auth/register", None, Some(registration("alice")))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["message"], "注册成功");
    assert_eq!(response.body["data"]["roles"], json!(["USER"]));
    assert!(response.body["data"].get("password_hash").is_none());

    let response = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["token_type"], "Bearer");
    assert_eq!(response.body["data"]["expires_in"], 1800);
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("cookie");
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    let token = response.body["data"]["token"]
        .as_str()
        .expect("token")
        .to_string();

    let response = app.send("GET", "/auth/profile", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "alice");
    assert_eq!(response.body["data"]["full_name"], "测试用户");

    let response = app
        .send(
            "PUT",
            "/auth/profile",
            Some(&token),
            Some(json!({ "phone": "13800138000" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["phone"], "13800138000");

    let response = app
        .send(
            "PUT",
            "/auth/profile",
            Some(&token),
            Some(json!({ "username": "mallory" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "不允许修改username");

    let response = app.send("POST", "/auth/logout", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("cookie");
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn register_rejects_weak_password_and_duplicates() {
    let app = spawn_app().await;

    let mut weak = registration("bobby");
    weak["password"] = json!("weakpass");
    let response = app.send("POST", "/auth/register", None, Some(weak)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error_code"], "VALIDATION_ERROR");
    assert_eq!(response.body["message"], "密码必须包含大写字母");

    let response = app
        .send("POST", "/auth/register", None, Some(registration("bobby")))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = app
        .send("POST", "/auth/register", None, Some(registration("bobby")))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error_code"], "USERNAME_EXISTS");

    let response = app.send("GET", "/auth/check-username/bobby", None, None).await;
    assert_eq!(response.body["data"]["available"], false);
    let response = app
        .send("GET", "/auth/check-email/carol@example.com", None, None)
        .await;
    assert_eq!(response.body["data"]["available"], true);
}

#[tokio::test]
async fn register_is_rate_limited_per_client() {
    let app = spawn_app().await;
    for username in ["frank", "grace", "heidi"] {
        let response = app
            .send("POST", "/auth/register", None, Some(registration(username)))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    // 第四次即使请求体非法也先被限流
    let response = app
        .send("POST", "/auth/register", None, Some(json!({ "username": "ivan" })))
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error_code"], "RATE_LIMIT_EXCEEDED");
    assert_eq!(response.headers[header::RETRY_AFTER], "60");
    assert_eq!(response.headers["x-ratelimit-remaining"], "0");

    // 登录不受注册限流影响
    let response = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "frank", "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn repeated_failures_lock_the_account() {
    let app = spawn_app().await;
    app.send("POST", "/auth/register", None, Some(registration("dave")))
        .await;
    let wrong = json!({ "username": "dave", "password": "Wr0ng!pass" });

    for _ in 0..5 {
        let response = app.send("POST", "/auth/login", None, Some(wrong.clone())).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error_code"], "INVALID_CREDENTIALS");
    }

    let response = app.send("POST", "/auth/login", None, Some(wrong.clone())).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["error_code"], "MAX_ATTEMPTS_EXCEEDED");

    // 锁定期间正确口令同样被拒绝
    let response = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "dave", "password": PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.body["error_code"], "ACCOUNT_LOCKED");
    assert!(
        response.body["message"]
            .as_str()
            .expect("message")
            .starts_with("账号已锁定")
    );
}

#[tokio::test]
async fn refresh_and_change_password() {
    let app = spawn_app().await;
    app.send("POST", "/auth/register", None, Some(registration("erin")))
        .await;
    let response = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "erin", "password": PASSWORD })),
        )
        .await;
    let token = response.body["data"]["token"]
        .as_str()
        .expect("token")
        .to_string();

    let response = app.send("POST", "/auth/refresh-token", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "token刷新成功");
    assert!(response.body["data"]["token"].is_string());

    let response = app
        .send("POST", "/auth/refresh-token", Some("not-a-token"), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "oldPassword": "Wr0ng!pass", "newPassword": "N3w!passw0rd" })),
        )
        .await;
    assert_eq!(response.body["error_code"], "OLD_PASSWORD_INCORRECT");

    let response = app
        .send(
            "POST",
            "/auth/change-password",
            Some(&token),
            Some(json!({ "old_password": PASSWORD, "new_password": "N3w!passw0rd" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "erin", "password": "N3w!passw0rd" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_token_and_role() {
    let app = spawn_app().await;

    let response = app.send("GET", "/auth/profile", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error_code"], "TOKEN_MISSING");

    let response = app.send("GET", "/auth/profile", Some("garbage"), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error_code"], "TOKEN_INVALID");

    let user_token = app.user_with_roles("frank", &[Role::User]).await;
    let response = app.send("GET", "/auth/users", Some(&user_token), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error_code"], "PERMISSION_DENIED");

    let admin_token = app.user_with_roles("root", &[Role::Admin]).await;
    let response = app
        .send("GET", "/auth/users?page=1&size=1", Some(&admin_token), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["total"], 2);
    assert_eq!(response.body["data"]["users"].as_array().map(Vec::len), Some(1));
}
