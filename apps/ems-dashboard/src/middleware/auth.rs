//! 认证和授权中间件
//!
//! - request_context：注入 request_id/trace_id，并写回响应头
//! - session_token：依次从 `Authorization: Bearer` 与 `access_token` cookie 提取会话 token
//! - require_principal：校验 token 并检查角色，返回请求主体
//! - client_addr：登录尝试计数使用的来源地址

use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use domain::{Principal, Role};
use ems_auth::{AccessError, authorize};
use ems_telemetry::new_request_ids;
use std::net::SocketAddr;
use tracing::{Instrument, info_span, warn};

use crate::AppState;
use crate::utils::response::access_error;

/// 会话 cookie 名称
pub const SESSION_COOKIE: &str = "access_token";

/// 请求上下文中间件：注入 request_id/trace_id
pub async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}

/// 从请求头中提取 Bearer token
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header_value = headers.get(header::AUTHORIZATION)?;
    let auth_str = header_value.to_str().ok()?;
    auth_str.strip_prefix("Bearer ")
}

/// 从 Cookie 头中提取会话 token
pub fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Bearer 优先，其次 cookie
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

/// 校验 token 并检查角色；`required` 为空表示任意已登录用户。
pub fn require_principal(
    state: &AppState,
    headers: &HeaderMap,
    required: &[Role],
) -> Result<Principal, Response> {
    authorize(state.auth.jwt(), session_token(headers), required).map_err(|err| {
        if err == AccessError::Forbidden {
            warn!(target: "ems.http", required = ?required, "permission_denied");
        }
        access_error(err)
    })
}

/// 来源地址（连接对端 IP）；无连接信息时为 `unknown`。
pub fn client_addr(connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 登录 / 刷新时写入的会话 cookie
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={max_age_seconds}; SameSite=Lax")
}

/// 登出时清除会话 cookie
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(bearer_token(&headers), Some("token-1"));
        assert_eq!(session_token(&headers), Some("token-1"));
    }

    #[test]
    fn cookie_token_is_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=token-2"),
        );
        assert_eq!(session_token(&headers), Some("token-2"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token-1"),
        );
        assert_eq!(session_token(&headers), Some("token-1"));
    }

    #[test]
    fn empty_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn client_addr_uses_peer_ip() {
        assert_eq!(client_addr(None), "unknown");
        let info = ConnectInfo(SocketAddr::from(([10, 0, 0, 9], 51000)));
        assert_eq!(client_addr(Some(&info)), "10.0.0.9");
    }
}
