use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use executor_domain::{JobParam, RunParam};
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::handler::{JobContext, JobHandler};
use super::job_log::JobLogger;

/// 一次触发对应的一个执行实例。同一个 jobId 的多次触发不会复用 Job。
pub struct Job {
    pub id: i64,
    pub log_id: i64,
    pub log_date_time: i64,
    pub name: String,
    pub param: JobParam,
    /// 0 表示不限时
    pub timeout_seconds: i64,
    handler: Arc<dyn JobHandler>,
    cancel: CancellationToken,
    timed_out: AtomicBool,
    created_at: DateTime<Utc>,
    started_at: OnceLock<DateTime<Utc>>,
    finished_at: OnceLock<DateTime<Utc>>,
}

impl Job {
    /// 取消令牌派生自 `parent`，执行器关闭时所有任务一起被取消
    pub fn new(
        run: &RunParam,
        handler: Arc<dyn JobHandler>,
        parent: &CancellationToken,
    ) -> Self {
        Self {
            id: run.job_id,
            log_id: run.log_id,
            log_date_time: run.log_date_time,
            name: run.executor_handler.clone(),
            param: run.job_param(),
            timeout_seconds: run.executor_timeout,
            handler,
            cancel: parent.child_token(),
            timed_out: AtomicBool::new(false),
            created_at: Utc::now(),
            started_at: OnceLock::new(),
            finished_at: OnceLock::new(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        u64::try_from(self.timeout_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// 强制终止：只发出取消信号，不等待处理器返回
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at.get().copied()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at.get().copied()
    }

    /// 处理器实际运行的时长，尚未结束时返回 None
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at(), self.finished_at()) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// 调用处理器并返回结果。超时到期后取消令牌会被触发，由处理器自行退出。
    pub async fn run(self: &Arc<Self>, logger: Option<Arc<JobLogger>>) -> anyhow::Result<()> {
        let timer = self.timeout().map(|timeout| {
            let job = Arc::clone(self);
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(timeout) => {
                        job.timed_out.store(true, Ordering::Release);
                        warn!("[{}:{}] job timed out after {:?}", job.id, job.log_id, timeout);
                        job.cancel.cancel();
                    }
                    _ = job.cancel.cancelled() => {}
                }
            })
        });

        let _ = self.started_at.set(Utc::now());
        if let Some(logger) = &logger {
            logger.info(&format!(
                "job start: id={} logId={} handler={} params={}",
                self.id, self.log_id, self.name, self.param.params
            ));
        }

        let ctx = JobContext::new(self.id, self.log_id, self.cancel.clone(), logger.clone());
        let result = AssertUnwindSafe(self.handler.execute(ctx, self.param.clone()))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(anyhow::anyhow!(
                    "job handler panicked: {}",
                    panic_message(payload.as_ref())
                ))
            });

        let _ = self.finished_at.set(Utc::now());
        if let Some(timer) = timer {
            timer.abort();
        }

        if let Some(logger) = &logger {
            match &result {
                Ok(()) => logger.info("job success"),
                Err(e) => logger.error(&format!("job failed: {e:#}")),
            }
        }
        result
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("log_id", &self.log_id)
            .field("name", &self.name)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
