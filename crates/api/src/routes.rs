use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use executor_common::{
    EXECUTOR_BEAT_PATH, EXECUTOR_IDLE_BEAT_PATH, EXECUTOR_KILL_PATH, EXECUTOR_LOG_PATH,
    EXECUTOR_RUN_PATH,
};
use executor_worker::Executor;

use crate::handlers::executor::{beat, idle_beat, kill, log, run};
use crate::middleware::access_token_guard;

/// HTTP 服务状态
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<Executor>,
    pub access_token: Option<String>,
    pub validate_access_token: bool,
}

impl AppState {
    pub fn new(executor: Arc<Executor>) -> Self {
        let config = executor.config();
        let access_token = config.admin.access_token().map(str::to_string);
        let validate_access_token = config.server.validate_access_token;
        Self {
            executor,
            access_token,
            validate_access_token,
        }
    }

    pub fn required_token(&self) -> Option<&str> {
        if self.validate_access_token {
            self.access_token.as_deref()
        } else {
            None
        }
    }
}

/// 创建执行器路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route(EXECUTOR_BEAT_PATH, get(beat).post(beat))
        .route(EXECUTOR_IDLE_BEAT_PATH, post(idle_beat))
        .route(EXECUTOR_RUN_PATH, post(run))
        .route(EXECUTOR_KILL_PATH, post(kill))
        .route(EXECUTOR_LOG_PATH, post(log))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_token_guard,
        ))
        .with_state(state)
}
