use axum::extract::State;
use executor_domain::{IdleBeatParam, KillParam, LogParam, LogResult, RunParam};
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::WireJson;
use crate::response::ApiResponse;
use crate::routes::AppState;

/// 心跳检测，不解析请求体
pub async fn beat() -> ApiResponse {
    ApiResponse::success()
}

/// 忙碌检测：任务表中存在该 jobId 时返回失败
pub async fn idle_beat(
    State(state): State<AppState>,
    WireJson(param): WireJson<IdleBeatParam>,
) -> ApiResult<ApiResponse> {
    state.executor.idle_beat(param.job_id)?;
    Ok(ApiResponse::success())
}

pub async fn run(
    State(state): State<AppState>,
    WireJson(param): WireJson<RunParam>,
) -> ApiResult<ApiResponse> {
    debug!(
        "run request: jobId={}, logId={}, handler={}",
        param.job_id, param.log_id, param.executor_handler
    );
    state.executor.trigger_job(&param)?;
    Ok(ApiResponse::success())
}

/// 终止任务，任务不存在时同样返回成功
pub async fn kill(
    State(state): State<AppState>,
    WireJson(param): WireJson<KillParam>,
) -> ApiResult<ApiResponse> {
    state.executor.kill_job(param.job_id);
    Ok(ApiResponse::success())
}

/// 不提供远程日志查看，固定返回日志已结束
pub async fn log(WireJson(param): WireJson<LogParam>) -> ApiResult<ApiResponse> {
    debug!(
        "log request: logId={}, fromLineNum={}",
        param.log_id, param.from_line_num
    );
    Ok(ApiResponse::success_with_content(LogResult::not_available()))
}
