//! JSON 请求体提取器
//!
//! `ApiJson<T>` 与 `axum::Json<T>` 用法一致，解析失败时返回统一信封：
//! 400 `VALIDATION_ERROR`，而不是 axum 默认的纯文本 400/415/422。

use crate::utils::response::validation_error;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    response::Response,
};
use serde::de::DeserializeOwned;
use tracing::debug;

pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Response {
    debug!(target: "ems.http", status = %rejection.status(), "json_rejected");
    validation_error(format!("请求体格式错误: {}", rejection.body_text()))
}
