use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError,
};
use executor_errors::ExecutorError;
use tracing::warn;

use crate::response::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("request timed out")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// 协议要求所有响应的 HTTP 状态码都是 200，失败通过 code=500 表示
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let msg = self.to_string();
        warn!("request failed: {}", msg);
        (StatusCode::OK, ApiResponse::error(msg)).into_response()
    }
}

/// 中间件返回的错误，超时映射为 `Timeout`
pub async fn handle_service_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
