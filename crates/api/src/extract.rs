use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON 请求体提取器
///
/// 与 `axum::Json` 不同，不检查 Content-Type，解析失败时返回协议格式的错误响应。
#[derive(Debug, Clone)]
pub struct WireJson<T>(pub T);

impl<T, S> FromRequest<S> for WireJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(WireJson(serde_json::from_slice(&bytes)?))
    }
}
