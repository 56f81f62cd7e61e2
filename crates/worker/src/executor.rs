use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use executor_common::local_ip_or_loopback;
use executor_config::AppConfig;
use executor_domain::{RegistryParam, RunParam};
use executor_errors::ExecutorResult;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::components::{
    job_log, AdminClient, CallbackReporter, HandlerRegistry, JobHandler, JobLogStore, JobManager,
    JobTable, Registrar, TaskHandle,
};

/// 执行器：持有任务表、处理器注册表以及注册心跳、结果上报两个后台任务
pub struct Executor {
    config: AppConfig,
    manager: JobManager,
    registrar: Registrar,
    registrar_task: Mutex<Option<TaskHandle>>,
    reporter_task: Mutex<Option<TaskHandle>>,
    cleaner_task: Mutex<Option<TaskHandle>>,
    stopped: AtomicBool,
}

impl Executor {
    pub fn builder(config: AppConfig) -> ExecutorBuilder {
        ExecutorBuilder::new(config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn register_handler(&self, name: impl Into<String>, handler: Arc<dyn JobHandler>) {
        let name = name.into();
        info!("job handler registered: {}", name);
        self.manager.handlers().register(name, handler);
    }

    pub fn remove_handler(&self, name: &str) -> bool {
        self.manager.handlers().remove(name).is_some()
    }

    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        self.manager.handlers()
    }

    pub fn job_table(&self) -> &Arc<JobTable> {
        self.manager.jobs()
    }

    pub fn registry_param(&self) -> &RegistryParam {
        self.registrar.param()
    }

    pub fn trigger_job(&self, run: &RunParam) -> ExecutorResult<()> {
        self.manager.trigger(run)
    }

    /// 终止任务；任务不存在时是空操作
    pub fn kill_job(&self, job_id: i64) -> bool {
        self.manager.kill(job_id)
    }

    pub fn idle_beat(&self, job_id: i64) -> ExecutorResult<()> {
        self.manager.check_idle(job_id)
    }

    /// 立即向调度中心注册一次，失败只记录日志
    pub async fn register(&self) -> bool {
        self.registrar.register().await
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// 停止顺序：注册心跳 → 注销 → 终止所有任务并等待结果入队 → 上报剩余结果 → 日志清理
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }
        info!("stopping executor {}", self.registrar.param().registry_key);

        if let Some(task) = take(&self.registrar_task) {
            task.stop().await;
        }
        self.registrar.deregister().await;
        self.manager.stop_all();
        let wait_timeout = self.config.server.wait_timeout();
        if !self.manager.wait_for_results(wait_timeout).await {
            warn!(
                "jobs did not finish within {:?}, their results will not be reported",
                wait_timeout
            );
        }
        if let Some(task) = take(&self.reporter_task) {
            task.stop().await;
        }
        if let Some(task) = take(&self.cleaner_task) {
            task.stop().await;
        }

        info!("executor stopped");
    }
}

fn take(slot: &Mutex<Option<TaskHandle>>) -> Option<TaskHandle> {
    slot.lock().ok().and_then(|mut guard| guard.take())
}

/// 注册到调度中心的执行器地址
pub fn registry_address(config: &AppConfig) -> String {
    if let Some(address) = config
        .executor
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        return address.to_string();
    }
    let ip = config
        .executor
        .ip
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(local_ip_or_loopback);
    format!("http://{}:{}", ip, config.server.port)
}

pub struct ExecutorBuilder {
    config: AppConfig,
    handlers: Vec<(String, Arc<dyn JobHandler>)>,
}

impl ExecutorBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            handlers: Vec::new(),
        }
    }

    pub fn handler(mut self, name: impl Into<String>, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.push((name.into(), handler));
        self
    }

    /// 创建执行器并启动后台任务，必须在 tokio 运行时中调用
    pub fn build(self) -> ExecutorResult<Arc<Executor>> {
        let config = self.config;
        let client = Arc::new(AdminClient::new(&config.admin)?);

        let handlers = Arc::new(HandlerRegistry::new());
        for (name, handler) in self.handlers {
            handlers.register(name, handler);
        }

        let (callback_tx, callback_rx) = mpsc::channel(config.admin.callback_buffer_size.max(1));
        let job_logs = JobLogStore::from_config(&config.job_log);
        let manager = JobManager::new(
            handlers,
            callback_tx,
            job_logs.clone(),
            config.executor.serial_poll_interval(),
        );

        let param = RegistryParam::executor(&config.executor.app_name, registry_address(&config));
        let registrar = Registrar::new(
            Arc::clone(&client),
            param,
            config.admin.register_interval(),
        );

        let registrar_task = registrar.start();
        let reporter_task =
            CallbackReporter::new(client, callback_rx, config.admin.callback_interval()).start();
        let cleaner_task = job_logs
            .map(|store| job_log::start_cleaner(store, config.job_log.cleanup_interval()));

        info!(
            "executor {} created, registry address {}, admin {}",
            registrar.param().registry_key,
            registrar.param().registry_value,
            config.admin.base_url()
        );

        Ok(Arc::new(Executor {
            config,
            manager,
            registrar,
            registrar_task: Mutex::new(Some(registrar_task)),
            reporter_task: Mutex::new(Some(reporter_task)),
            cleaner_task: Mutex::new(cleaner_task),
            stopped: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_address() {
        let mut config = AppConfig::default();
        config.server.port = 9998;
        config.executor.ip = Some("10.0.0.8".to_string());
        assert_eq!(registry_address(&config), "http://10.0.0.8:9998");

        config.executor.address = Some(" http://executor.local:9999 ".to_string());
        assert_eq!(registry_address(&config), "http://executor.local:9999");

        config.executor.address = Some(String::new());
        config.executor.ip = None;
        let address = registry_address(&config);
        assert!(address.starts_with("http://"));
        assert!(address.ends_with(":9998"));
    }
}
