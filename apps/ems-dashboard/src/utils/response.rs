//! HTTP 响应辅助函数
//!
//! 所有响应统一为 `ApiResponse` 信封，错误按下表映射：
//!
//! | 错误 | HTTP | error_code |
//! |---|---|---|
//! | 校验失败 / 弱口令 | 400 | `VALIDATION_ERROR` 或具体码 |
//! | 删除仍被引用的记录 | 400 | `REFERENCE_EXISTS` |
//! | 未认证 | 401 | `TOKEN_MISSING` / `TOKEN_INVALID` |
//! | 无权限 | 403 | `PERMISSION_DENIED` |
//! | 不存在 | 404 | `NOT_FOUND` |
//! | 锁定 | 429 | `ACCOUNT_LOCKED` / `MAX_ATTEMPTS_EXCEEDED` |
//! | 请求过于频繁 | 429 | `RATE_LIMIT_EXCEEDED` |
//! | 事务 / 存储错误 | 500 | `TRANSACTION_FAILED` / `PERSISTENCE_ERROR` |
//!
//! 500 响应只返回通用提示，底层错误写日志。

use api_contract::ApiResponse;
use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use ems_auth::{AccessError, AuthError, RateLimitDecision};
use ems_storage::StorageError;
use ems_workflow::WorkflowError;
use serde::Serialize;
use tracing::error;

const PERSISTENCE_MESSAGE: &str = "服务器内部错误";
const TRANSACTION_MESSAGE: &str = "事务执行失败，已回滚";

/// 成功响应（带数据）
pub fn success<T: Serialize>(status: StatusCode, data: T, message: &str) -> Response {
    (status, Json(ApiResponse::success(data, message))).into_response()
}

/// 成功响应（无数据）
pub fn message(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::message(message))).into_response()
}

/// 错误响应
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(code, message))).into_response()
}

pub fn validation_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

pub fn not_found_error(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

/// 未认证 / 无权限
pub fn access_error(err: AccessError) -> Response {
    match err {
        AccessError::TokenMissing => {
            error_response(StatusCode::UNAUTHORIZED, "TOKEN_MISSING", "token不存在")
        }
        AccessError::TokenInvalid => {
            error_response(StatusCode::UNAUTHORIZED, "TOKEN_INVALID", "token无效或已过期")
        }
        AccessError::Forbidden => {
            error_response(StatusCode::FORBIDDEN, "PERMISSION_DENIED", "权限不足")
        }
    }
}

/// 认证服务错误
pub fn auth_error(err: AuthError) -> Response {
    let (status, code) = match &err {
        AuthError::InvalidCredentials => (StatusCode::BAD_REQUEST, "INVALID_CREDENTIALS"),
        AuthError::TokenInvalid => (StatusCode::UNAUTHORIZED, "TOKEN_INVALID"),
        AuthError::AccountLocked { .. } => (StatusCode::TOO_MANY_REQUESTS, "ACCOUNT_LOCKED"),
        AuthError::MaxAttemptsExceeded { .. } => {
            (StatusCode::TOO_MANY_REQUESTS, "MAX_ATTEMPTS_EXCEEDED")
        }
        AuthError::WeakPassword(_) | AuthError::Validation(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        }
        AuthError::UsernameTaken => (StatusCode::BAD_REQUEST, "USERNAME_EXISTS"),
        AuthError::EmailTaken => (StatusCode::BAD_REQUEST, "EMAIL_EXISTS"),
        AuthError::OldPasswordIncorrect => (StatusCode::BAD_REQUEST, "OLD_PASSWORD_INCORRECT"),
        AuthError::UserNotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        AuthError::Internal(detail) => {
            error!(target: "ems.http", error = %detail, "auth_internal_error");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                PERSISTENCE_MESSAGE,
            );
        }
    };
    error_response(status, code, err.to_string())
}

/// 限流拒绝：429，附带 `retry-after` 与 `x-ratelimit-*` 头
pub fn rate_limited_error(decision: RateLimitDecision) -> Response {
    let mut response = error_response(
        StatusCode::TOO_MANY_REQUESTS,
        "RATE_LIMIT_EXCEEDED",
        "请求过于频繁，请稍后再试",
    );
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static("x-ratelimit-limit"),
        HeaderValue::from(decision.limit),
    );
    headers.insert(
        HeaderName::from_static("x-ratelimit-remaining"),
        HeaderValue::from(decision.remaining),
    );
    if let Some(seconds) = decision.retry_after_seconds {
        headers.insert(header::RETRY_AFTER, HeaderValue::from(seconds));
    }
    response
}

/// 工作流错误
pub fn workflow_error(err: WorkflowError) -> Response {
    match err {
        WorkflowError::Validation(message) => validation_error(message),
        WorkflowError::NotFound(message) => not_found_error(message),
        WorkflowError::TransactionFailed(detail) => {
            error!(target: "ems.http", error = %detail, "workflow_transaction_failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "TRANSACTION_FAILED",
                TRANSACTION_MESSAGE,
            )
        }
        WorkflowError::Persistence(detail) => {
            error!(target: "ems.http", error = %detail, "workflow_persistence_error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                PERSISTENCE_MESSAGE,
            )
        }
    }
}

/// 存储错误
pub fn storage_error(err: StorageError) -> Response {
    error!(target: "ems.http", error = %err, "storage_error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "PERSISTENCE_ERROR",
        PERSISTENCE_MESSAGE,
    )
}

/// 删除失败：仍被引用时返回 400，其它存储错误按 500 处理
pub fn delete_error(err: StorageError, referenced_message: &str) -> Response {
    if err.is_foreign_key_violation() {
        return error_response(StatusCode::BAD_REQUEST, "REFERENCE_EXISTS", referenced_message);
    }
    storage_error(err)
}
