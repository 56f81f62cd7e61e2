//! 示例任务处理器

use std::sync::Arc;
use std::time::Duration;

use executor_worker::{handler_fn, JobContext, JobHandler, JobParam};
use tracing::info;

pub const DEMO_JOB_HANDLER: &str = "demoJobHandler";
pub const SHARDING_JOB_HANDLER: &str = "shardingJobHandler";

pub fn demo_handlers() -> Vec<(&'static str, Arc<dyn JobHandler>)> {
    vec![
        (DEMO_JOB_HANDLER, handler_fn(demo_job)),
        (SHARDING_JOB_HANDLER, handler_fn(sharding_job)),
    ]
}

async fn demo_job(ctx: JobContext, param: JobParam) -> anyhow::Result<()> {
    info!("[{}:{}] demo job params: {}", ctx.job_id(), ctx.log_id(), param.params);
    ctx.log_info(format!("Job executed with params: {}", param.params));
    Ok(())
}

/// 按分片序号模拟一段耗时处理，期间响应取消
async fn sharding_job(ctx: JobContext, param: JobParam) -> anyhow::Result<()> {
    ctx.log_info(format!(
        "sharding index={}, total={}",
        param.sharding_index, param.sharding_total
    ));

    for step in 1..=5 {
        tokio::select! {
            _ = ctx.cancelled() => {
                ctx.log_error(format!("cancelled at step {step}"));
                anyhow::bail!("job cancelled at step {step}");
            }
            _ = tokio::time::sleep(Duration::from_secs(1)) => {
                ctx.log_info(format!("step {step} done"));
            }
        }
    }
    Ok(())
}
