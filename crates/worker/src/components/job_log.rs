use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use executor_config::JobLogConfig;
use executor_errors::ExecutorResult;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::background::TaskHandle;

const DATE_DIR_FORMAT: &str = "%Y-%m-%d";

/// 单次任务执行的日志文件目录，按 `<dir>/<yyyy-mm-dd>/<logId>.log` 组织
#[derive(Debug, Clone)]
pub struct JobLogStore {
    dir: PathBuf,
    retention_days: u32,
}

impl JobLogStore {
    pub fn new(dir: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            dir: dir.into(),
            retention_days,
        }
    }

    /// 未启用任务日志时返回 None
    pub fn from_config(config: &JobLogConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(&config.dir, config.retention_days))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 日志日期取调度中心下发的 logDateTime（毫秒），缺省时使用当前时间
    pub fn log_path(&self, log_id: i64, log_date_time: i64) -> PathBuf {
        let date = Local
            .timestamp_millis_opt(log_date_time)
            .single()
            .filter(|_| log_date_time > 0)
            .unwrap_or_else(Local::now);
        self.dir
            .join(date.format(DATE_DIR_FORMAT).to_string())
            .join(format!("{log_id}.log"))
    }

    pub fn open(&self, log_id: i64, log_date_time: i64) -> ExecutorResult<JobLogger> {
        let path = self.log_path(log_id, log_date_time);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(JobLogger {
            path,
            file: Mutex::new(file),
        })
    }

    /// 删除超过保留天数的日期目录，返回删除的目录数。非日期命名的目录不受影响。
    pub fn cleanup_expired(&self, today: NaiveDate) -> ExecutorResult<usize> {
        if self.retention_days == 0 || !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(date) = name
                .to_str()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_DIR_FORMAT).ok())
            else {
                continue;
            };

            if (today - date).num_days() >= i64::from(self.retention_days) {
                match fs::remove_dir_all(entry.path()) {
                    Ok(()) => {
                        debug!("removed expired job log dir {}", entry.path().display());
                        removed += 1;
                    }
                    Err(e) => warn!(
                        "failed to remove job log dir {}: {}",
                        entry.path().display(),
                        e
                    ),
                }
            }
        }
        Ok(removed)
    }
}

/// 启动日志清理任务：启动时清理一次，之后按间隔执行
pub fn start_cleaner(store: JobLogStore, interval: Duration) -> TaskHandle {
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let handle = tokio::spawn(async move {
        loop {
            let task_store = store.clone();
            let today = Local::now().date_naive();
            match tokio::task::spawn_blocking(move || task_store.cleanup_expired(today)).await {
                Ok(Ok(0)) => {}
                Ok(Ok(removed)) => info!("removed {} expired job log dirs", removed),
                Ok(Err(e)) => warn!("job log cleanup failed: {}", e),
                Err(e) => warn!("job log cleanup task failed: {}", e),
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = token.cancelled() => break,
            }
        }
    });
    TaskHandle::new("job-log-cleaner", shutdown, handle)
}

/// 单个任务日志文件的写入端
#[derive(Debug)]
pub struct JobLogger {
    path: PathBuf,
    file: Mutex<File>,
}

impl JobLogger {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, msg: &str) {
        self.write_line("INFO", msg);
    }

    pub fn error(&self, msg: &str) {
        self.write_line("ERROR", msg);
    }

    fn write_line(&self, level: &str, msg: &str) {
        let now: DateTime<Local> = Local::now();
        let line = format!("{} [{}] {}\n", now.format("%Y-%m-%d %H:%M:%S%.3f"), level, msg);
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("failed to write job log {}: {}", self.path.display(), e);
        }
    }
}
