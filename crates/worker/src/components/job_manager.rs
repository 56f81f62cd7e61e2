use std::sync::Arc;
use std::time::{Duration, Instant};

use executor_common::{timestamp_millis, truncate_duration, CALLBACK_SUCCESS_MSG};
use executor_domain::{CallbackParam, RunParam, FAILURE_CODE, SUCCESS_CODE};
use executor_errors::{ExecutorError, ExecutorResult};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::block_strategy::{self, Admission};
use super::handler::HandlerRegistry;
use super::job::Job;
use super::job_log::{JobLogStore, JobLogger};
use super::job_table::JobTable;

/// 触发、终止和完成回调的入口
#[derive(Clone)]
pub struct JobManager {
    jobs: Arc<JobTable>,
    handlers: Arc<HandlerRegistry>,
    callback_tx: mpsc::Sender<CallbackParam>,
    job_logs: Option<Arc<JobLogStore>>,
    poll_interval: Duration,
    root: CancellationToken,
    /// 完成回调的 watch 任务
    watchers: TaskTracker,
}

impl JobManager {
    pub fn new(
        handlers: Arc<HandlerRegistry>,
        callback_tx: mpsc::Sender<CallbackParam>,
        job_logs: Option<JobLogStore>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            jobs: Arc::new(JobTable::new()),
            handlers,
            callback_tx,
            job_logs: job_logs.map(Arc::new),
            poll_interval,
            root: CancellationToken::new(),
            watchers: TaskTracker::new(),
        }
    }

    pub fn jobs(&self) -> &Arc<JobTable> {
        &self.jobs
    }

    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    /// 处理一次触发请求。准入通过后立即返回，任务在后台运行。
    pub fn trigger(&self, run: &RunParam) -> ExecutorResult<()> {
        match block_strategy::resolve(self.jobs.get(run.job_id), run) {
            Admission::RejectDuplicate => {
                warn!("[{}:{}] duplicate trigger rejected", run.job_id, run.log_id);
                return Err(ExecutorError::DuplicateLogId {
                    job_id: run.job_id,
                    log_id: run.log_id,
                });
            }
            Admission::RejectBusy(incumbent) => {
                info!(
                    "[{}:{}] discard later, job is running with logId={}",
                    run.job_id, run.log_id, incumbent.log_id
                );
                return Err(ExecutorError::JobBusy { job_id: run.job_id });
            }
            Admission::Cover(incumbent) => {
                info!(
                    "[{}:{}] cover early, stopping job with logId={}",
                    run.job_id, run.log_id, incumbent.log_id
                );
                self.terminate(&incumbent);
            }
            Admission::Proceed => {}
        }

        let handler = self
            .handlers
            .get(&run.executor_handler)
            .ok_or_else(|| ExecutorError::handler_not_found(&run.executor_handler))?;

        let job = Arc::new(Job::new(run, handler, &self.root));
        info!(
            "[{}:{}] job triggered, handler={}, strategy={}",
            job.id, job.log_id, job.name, run.executor_block_strategy
        );

        let (done_tx, done_rx) = oneshot::channel();
        self.watchers.spawn(self.clone().watch(Arc::clone(&job), done_rx));
        tokio::spawn(self.clone().execute(job, done_tx));
        Ok(())
    }

    /// 终止指定 jobId 的任务，不存在时返回 false
    pub fn kill(&self, job_id: i64) -> bool {
        match self.jobs.remove(job_id) {
            Some(job) => {
                job.stop();
                info!("[{}:{}] job killed", job.id, job.log_id);
                true
            }
            None => {
                debug!("kill ignored, job {} is not running", job_id);
                false
            }
        }
    }

    pub fn check_idle(&self, job_id: i64) -> ExecutorResult<()> {
        if self.jobs.contains(job_id) {
            return Err(ExecutorError::JobRunning { job_id });
        }
        Ok(())
    }

    /// 取消所有任务（包括仍在串行等待中的任务），并清空任务表
    pub fn stop_all(&self) {
        self.root.cancel();
        let jobs = self.jobs.snapshot();
        for job in &jobs {
            self.terminate(job);
        }
        if !jobs.is_empty() {
            info!("stopped {} running jobs", jobs.len());
        }
    }

    /// 等待已触发任务的结果全部进入回调队列，超时返回 false
    pub async fn wait_for_results(&self, timeout: Duration) -> bool {
        self.watchers.close();
        tokio::time::timeout(timeout, self.watchers.wait()).await.is_ok()
    }

    fn terminate(&self, job: &Arc<Job>) {
        job.stop();
        self.jobs.remove_instance(job);
    }

    async fn execute(self, job: Arc<Job>, done: oneshot::Sender<anyhow::Result<()>>) {
        let result = if self.wait_for_slot(&job).await {
            let logger = self.open_job_log(&job).await;
            job.run(logger).await
        } else {
            Err(anyhow::anyhow!("job was cancelled before it started"))
        };
        let _ = done.send(result);
    }

    /// 串行策略：轮询等待同一 jobId 的旧任务离开任务表
    async fn wait_for_slot(&self, job: &Arc<Job>) -> bool {
        let started = Instant::now();
        loop {
            if job.is_stopped() {
                return false;
            }
            if self.jobs.try_occupy(job) {
                if job.is_stopped() {
                    self.jobs.remove_instance(job);
                    return false;
                }
                return true;
            }
            debug!(
                "[{}:{}] waiting for old job to finish, time elapsed: {:?}",
                job.id,
                job.log_id,
                truncate_duration(started.elapsed())
            );
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = job.token().cancelled() => {}
            }
        }
    }

    /// 创建目录和打开文件都是阻塞调用，放到阻塞线程池执行
    async fn open_job_log(&self, job: &Job) -> Option<Arc<JobLogger>> {
        let store = Arc::clone(self.job_logs.as_ref()?);
        let (log_id, log_date_time) = (job.log_id, job.log_date_time);
        match tokio::task::spawn_blocking(move || store.open(log_id, log_date_time)).await {
            Ok(Ok(logger)) => Some(Arc::new(logger)),
            Ok(Err(e)) => {
                warn!("[{}:{}] failed to open job log: {}", job.id, job.log_id, e);
                None
            }
            Err(e) => {
                warn!("[{}:{}] job log open task failed: {}", job.id, job.log_id, e);
                None
            }
        }
    }

    async fn watch(self, job: Arc<Job>, done: oneshot::Receiver<anyhow::Result<()>>) {
        let result = done
            .await
            .unwrap_or_else(|_| Err(anyhow::anyhow!("job execution task exited unexpectedly")));
        self.jobs.remove_instance(&job);

        let callback = match &result {
            Ok(()) => {
                info!(
                    "[{}:{}] job finished, duration={:?}",
                    job.id,
                    job.log_id,
                    job.duration()
                );
                CallbackParam {
                    log_id: job.log_id,
                    log_date_time: timestamp_millis(),
                    handle_code: SUCCESS_CODE,
                    handle_msg: CALLBACK_SUCCESS_MSG.to_string(),
                }
            }
            Err(e) => {
                error!("[{}:{}] job failed: {:#}", job.id, job.log_id, e);
                CallbackParam {
                    log_id: job.log_id,
                    log_date_time: timestamp_millis(),
                    handle_code: FAILURE_CODE,
                    handle_msg: format!("{e:#}"),
                }
            }
        };

        if self.callback_tx.send(callback).await.is_err() {
            warn!("[{}:{}] callback queue closed, result dropped", job.id, job.log_id);
        }
    }
}
