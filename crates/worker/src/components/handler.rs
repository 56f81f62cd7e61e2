use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use executor_domain::JobParam;
use tokio_util::sync::CancellationToken;

use super::job_log::JobLogger;

/// 任务处理器
///
/// 处理器需要自行检查 [`JobContext`] 中的取消信号并尽快返回，框架不会强制中断处理器。
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn execute(&self, ctx: JobContext, param: JobParam) -> anyhow::Result<()>;
}

/// 处理器执行上下文
#[derive(Clone)]
pub struct JobContext {
    job_id: i64,
    log_id: i64,
    cancel: CancellationToken,
    logger: Option<Arc<JobLogger>>,
}

impl JobContext {
    pub fn new(
        job_id: i64,
        log_id: i64,
        cancel: CancellationToken,
        logger: Option<Arc<JobLogger>>,
    ) -> Self {
        Self {
            job_id,
            log_id,
            cancel,
            logger,
        }
    }

    pub fn job_id(&self) -> i64 {
        self.job_id
    }

    pub fn log_id(&self) -> i64 {
        self.log_id
    }

    /// 任务被终止、超时或执行器关闭时返回 true
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 等待取消信号
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// 写入任务日志文件，未启用任务日志时什么也不做
    pub fn log_info(&self, msg: impl AsRef<str>) {
        if let Some(logger) = &self.logger {
            logger.info(msg.as_ref());
        }
    }

    pub fn log_error(&self, msg: impl AsRef<str>) {
        if let Some(logger) = &self.logger {
            logger.error(msg.as_ref());
        }
    }
}

/// 把异步闭包包装成处理器
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> JobHandler for FnHandler<F>
where
    F: Fn(JobContext, JobParam) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn execute(&self, ctx: JobContext, param: JobParam) -> anyhow::Result<()> {
        (self.f)(ctx, param).await
    }
}

pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn JobHandler>
where
    F: Fn(JobContext, JobParam) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}

/// 处理器注册表，key 为处理器名称
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册处理器，同名处理器会被替换
    pub fn register(&self, name: impl Into<String>, handler: Arc<dyn JobHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.remove(name).map(|(_, handler)| handler)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
