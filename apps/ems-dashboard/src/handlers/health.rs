//! 健康检查
//!
//! - `GET /health`、`GET /livez`：进程存活，返回 `{"ok": true}`
//! - `GET /readyz`：配置了 Postgres 时执行 `select 1`

use crate::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

pub async fn health() -> impl IntoResponse {
    livez().await
}

/// Liveness 探针：不检查外部依赖。
pub async fn livez() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Readiness 探针：内存模式总是就绪。
pub async fn readyz(State(state): State<AppState>) -> Response {
    let Some(pool) = state.db_pool.as_ref() else {
        return (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response();
    };

    match sqlx::query_scalar::<_, i32>("select 1").fetch_one(pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response(),
        Err(err) => {
            warn!(target: "ems.http", error = %err, "readyz_failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "ok": false })),
            )
                .into_response()
        }
    }
}
