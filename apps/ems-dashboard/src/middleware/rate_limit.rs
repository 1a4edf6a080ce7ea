//! 限流中间件
//!
//! 按 `{来源地址}:{接口}` 计数，超限直接返回 429，不进入 handler。

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use ems_auth::rate_limit_key;
use std::net::SocketAddr;

use super::auth::client_addr;
use crate::AppState;
use crate::utils::response::rate_limited_error;

/// 注册接口限流
pub async fn register_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let addr = client_addr(req.extensions().get::<ConnectInfo<SocketAddr>>());
    let decision = state
        .register_limiter
        .check(&rate_limit_key(&addr, "register"));
    if !decision.allowed {
        return rate_limited_error(decision);
    }
    next.run(req).await
}
