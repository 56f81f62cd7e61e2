//! # executor-api
//!
//! 调度中心调用执行器的 HTTP 接口：
//!
//! - `POST /beat` - 心跳检测
//! - `POST /idleBeat` - 忙碌检测
//! - `POST /run` - 触发任务
//! - `POST /kill` - 终止任务
//! - `POST /log` - 查看执行日志
//!
//! 所有接口都返回 HTTP 200，结果由响应体中的 `code` 表示。

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, Router};
use executor_worker::Executor;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::timeout::RequestBodyTimeoutLayer;

use error::handle_service_error;
use middleware::{request_logging, trace_layer};
pub use routes::{create_routes, AppState};

/// 创建完整的执行器 HTTP 应用
pub fn create_app(executor: Arc<Executor>) -> Router {
    let server = executor.config().server.clone();
    let state = AppState::new(executor);

    with_service_layers(
        create_routes(state),
        server.write_timeout(),
        server.read_timeout(),
    )
}

/// 追加日志和超时中间件
///
/// 读超时作用于请求体读取，写超时作用于整个请求处理。超时同样按协议返回 HTTP 200 和 code=500。
pub fn with_service_layers(
    router: Router,
    write_timeout: Duration,
    read_timeout: Duration,
) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging))
            .layer(HandleErrorLayer::new(handle_service_error))
            .layer(TimeoutLayer::new(write_timeout))
            .layer(RequestBodyTimeoutLayer::new(read_timeout)),
    )
}
