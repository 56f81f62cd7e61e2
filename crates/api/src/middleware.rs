use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use executor_common::ACCESS_TOKEN_HEADER;
use executor_errors::ExecutorError;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};
use tracing::debug;

use crate::error::ApiError;
use crate::routes::AppState;

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!("开始处理请求: {} {}", method, uri);

    let response = next.run(request).await;

    debug!(
        "完成请求处理: {} {} - 状态: {} - 耗时: {:?}",
        method,
        uri,
        response.status(),
        start.elapsed()
    );

    response
}

/// 校验调度中心请求携带的访问令牌，未开启校验或未配置令牌时直接放行
pub async fn access_token_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = state.required_token() {
        let provided = request
            .headers()
            .get(ACCESS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            return ApiError::from(ExecutorError::InvalidAccessToken).into_response();
        }
    }
    next.run(request).await
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
