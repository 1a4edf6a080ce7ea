#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use domain::Role;
use ems_auth::{HashAlgorithm, hash_password};
use ems_config::AppConfig;
use ems_dashboard::{AppState, Stores, app};
use ems_storage::{UserCreate, UserStore};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "Str0ng!pass";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<dyn UserStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| match key {
        "EMS_JWT_SECRET" => Some("test-secret".to_string()),
        _ => None,
    })
    .expect("config")
}

pub async fn spawn_app() -> TestApp {
    let stores = Stores::in_memory();
    let users = stores.users.clone();
    let state = AppState::new(stores, &test_config());
    state.auth.seed_roles().await.expect("seed roles");
    TestApp {
        router: app(state.clone()),
        state,
        users,
    }
}

impl TestApp {
    /// 直接写入用户并签发会话 token
    pub async fn user_with_roles(&self, username: &str, roles: &[Role]) -> String {
        let codes: Vec<String> = roles.iter().map(|role| role.code().to_string()).collect();
        let user = self
            .users
            .create_user(UserCreate {
                user_id: format!("U-{username}"),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                phone: None,
                full_name: None,
                password_hash: hash_password(PASSWORD, HashAlgorithm::Sha256),
                roles: codes.clone(),
            })
            .await
            .expect("create user");
        self.state
            .auth
            .jwt()
            .generate_session_token(&user.user_id, &user.username, &codes)
            .expect("token")
            .token
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("encode")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.dispatch(request).await
    }

    /// 原样发送请求体，不做 JSON 编码
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }
}
