use axum::{response::IntoResponse, Json};
use executor_domain::Response;
use serde::Serialize;

/// 调度中心协议的统一响应 `{code, msg, content}`
#[derive(Debug, Clone)]
pub struct ApiResponse(pub Response);

impl ApiResponse {
    pub fn success() -> Self {
        Self(Response::success())
    }

    pub fn success_with_content<T: Serialize>(content: T) -> Self {
        Self(Response::success_with_content(content))
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self(Response::error(msg))
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> axum::response::Response {
        Json(self.0).into_response()
    }
}
