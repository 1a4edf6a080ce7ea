//! 认证相关 handlers
//!
//! ## 公开端点
//! - `POST /auth/register` 注册（默认角色 USER；同一来源默认 60 秒内最多 3 次）
//! - `POST /auth/login` 登录，5 次失败锁定 30 分钟，成功后下发会话 token 并写 cookie
//! - `POST /auth/refresh-token` 用仍然有效的 token 换新 token
//! - `GET /auth/check-username/{username}`、`GET /auth/check-email/{email}`
//!
//! ## 需登录
//! - `POST /auth/logout`、`POST /auth/change-password`、`GET/PUT /auth/profile`
//! - `GET /auth/users`（ADMIN）

use crate::AppState;
use crate::middleware::{
    client_addr, expired_session_cookie, require_principal, session_cookie, session_token,
};
use crate::utils::dto::user_to_dto;
use crate::utils::json::ApiJson;
use crate::utils::normalize_optional;
use crate::utils::response::{access_error, auth_error, message, success, validation_error};
use api_contract::{
    AvailabilityDto, ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenResponse,
    RegisterRequest, UpdateProfileRequest, UserListQuery, UserListResponse,
};
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use domain::Role;
use ems_auth::{AccessError, Registration, required_field};
use ems_storage::UserProfileUpdate;
use std::net::SocketAddr;

const TOKEN_TYPE: &str = "Bearer";
const DEFAULT_PAGE_SIZE: usize = 20;
/// 个人资料接口不允许修改的字段
const IMMUTABLE_PROFILE_FIELDS: [&str; 3] = ["user_id", "username", "password"];

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    response
}

/// 注册（限流见 [`crate::middleware::register_rate_limit`]）
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Response {
    let username = match required_field(req.username.as_deref(), "username") {
        Ok(value) => value.to_string(),
        Err(err) => return auth_error(err),
    };
    let password = match required_field(req.password.as_deref(), "password") {
        Ok(value) => value.to_string(),
        Err(err) => return auth_error(err),
    };
    let email = match required_field(req.email.as_deref(), "email") {
        Ok(value) => value.to_string(),
        Err(err) => return auth_error(err),
    };
    let registration = Registration {
        username,
        password,
        email,
        phone: normalize_optional(req.phone),
        full_name: normalize_optional(req.full_name),
    };
    match state.auth.register(registration).await {
        Ok(user) => success(StatusCode::CREATED, user_to_dto(user), "注册成功"),
        Err(err) => auth_error(err),
    }
}

/// 登录
///
/// 失败计数按 `用户名@来源地址` 统计；锁定期间返回 429。
pub async fn login(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Response {
    let addr = client_addr(connect_info.as_ref());
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    match state.auth.login(&username, &password, &addr).await {
        Ok(outcome) => {
            let cookie = session_cookie(&outcome.session.token, outcome.session.expires_in);
            let data = LoginResponse {
                user: user_to_dto(outcome.user),
                token: outcome.session.token,
                expires_in: outcome.session.expires_in,
                token_type: TOKEN_TYPE.to_string(),
            };
            with_cookie(success(StatusCode::OK, data, "登录成功"), &cookie)
        }
        Err(err) => auth_error(err),
    }
}

/// 登出：清除会话 cookie（token 本身到期前仍有效）
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[]) {
        return response;
    }
    with_cookie(message(StatusCode::OK, "登出成功"), &expired_session_cookie())
}

/// 刷新 token：claims 不变，重新计算过期时间
pub async fn refresh_token(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return access_error(AccessError::TokenMissing);
    };
    match state.auth.refresh(token) {
        Ok((_, session)) => {
            let cookie = session_cookie(&session.token, session.expires_in);
            let data = RefreshTokenResponse {
                token: session.token,
                expires_in: session.expires_in,
                token_type: TOKEN_TYPE.to_string(),
            };
            with_cookie(success(StatusCode::OK, data, "token刷新成功"), &cookie)
        }
        Err(err) => auth_error(err),
    }
}

/// 修改口令
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Response {
    let principal = match require_principal(&state, &headers, &[]) {
        Ok(principal) => principal,
        Err(response) => return response,
    };
    let old_password = match required_field(req.old_password.as_deref(), "old_password") {
        Ok(value) => value,
        Err(err) => return auth_error(err),
    };
    let new_password = match required_field(req.new_password.as_deref(), "new_password") {
        Ok(value) => value,
        Err(err) => return auth_error(err),
    };
    match state
        .auth
        .change_password(&principal.user_id, old_password, new_password)
        .await
    {
        Ok(()) => message(StatusCode::OK, "密码修改成功"),
        Err(err) => auth_error(err),
    }
}

/// 获取个人信息
pub async fn get_profile(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let principal = match require_principal(&state, &headers, &[]) {
        Ok(principal) => principal,
        Err(response) => return response,
    };
    match state.auth.profile(&principal.user_id).await {
        Ok(user) => success(StatusCode::OK, user_to_dto(user), "获取个人信息成功"),
        Err(err) => auth_error(err),
    }
}

/// 更新个人信息（仅 email / phone / full_name）
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(body): ApiJson<serde_json::Value>,
) -> Response {
    let principal = match require_principal(&state, &headers, &[]) {
        Ok(principal) => principal,
        Err(response) => return response,
    };
    if let Some(field) = IMMUTABLE_PROFILE_FIELDS
        .iter()
        .find(|field| body.get(**field).is_some())
    {
        return validation_error(format!("不允许修改{field}"));
    }
    let req: UpdateProfileRequest = match serde_json::from_value(body) {
        Ok(req) => req,
        Err(_) => return validation_error("请求数据格式错误"),
    };
    let update = UserProfileUpdate {
        email: normalize_optional(req.email),
        phone: normalize_optional(req.phone),
        full_name: normalize_optional(req.full_name),
    };
    match state.auth.update_profile(&principal.user_id, update).await {
        Ok(user) => success(StatusCode::OK, user_to_dto(user), "更新成功"),
        Err(err) => auth_error(err),
    }
}

/// 用户名是否可用
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Response {
    match state.auth.username_available(&username).await {
        Ok(available) => success(StatusCode::OK, AvailabilityDto { available }, "查询成功"),
        Err(err) => auth_error(err),
    }
}

/// 邮箱是否可用
pub async fn check_email(State(state): State<AppState>, Path(email): Path<String>) -> Response {
    match state.auth.email_available(&email).await {
        Ok(available) => success(StatusCode::OK, AvailabilityDto { available }, "查询成功"),
        Err(err) => auth_error(err),
    }
}

/// 用户列表（ADMIN）
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserListQuery>,
) -> Response {
    if let Err(response) = require_principal(&state, &headers, &[Role::Admin]) {
        return response;
    }
    let page = query.page.unwrap_or(1);
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    match state.auth.list_users(page, size).await {
        Ok(result) => {
            let data = UserListResponse {
                users: result.users.into_iter().map(user_to_dto).collect(),
                total: result.total,
                page: result.page,
                size: result.size,
            };
            success(StatusCode::OK, data, "获取用户列表成功")
        }
        Err(err) => auth_error(err),
    }
}
