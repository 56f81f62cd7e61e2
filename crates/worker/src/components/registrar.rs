use std::sync::Arc;
use std::time::Duration;

use executor_domain::RegistryParam;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::admin_client::AdminClient;
use super::background::TaskHandle;

/// 向调度中心注册执行器，并按固定间隔续约
#[derive(Clone)]
pub struct Registrar {
    client: Arc<AdminClient>,
    param: RegistryParam,
    interval: Duration,
}

impl Registrar {
    pub fn new(client: Arc<AdminClient>, param: RegistryParam, interval: Duration) -> Self {
        Self {
            client,
            param,
            interval,
        }
    }

    pub fn param(&self) -> &RegistryParam {
        &self.param
    }

    /// 注册失败只记录日志
    pub async fn register(&self) -> bool {
        match self.client.register(&self.param).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "failed to register {} at {}: {}",
                    self.param.registry_key, self.param.registry_value, e
                );
                false
            }
        }
    }

    pub async fn deregister(&self) -> bool {
        match self.client.registry_remove(&self.param).await {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to unregister {}: {}", self.param.registry_key, e);
                false
            }
        }
    }

    /// 启动心跳任务，第一次续约在一个间隔之后
    pub fn start(&self) -> TaskHandle {
        let shutdown = CancellationToken::new();
        let registrar = self.clone();
        let token = shutdown.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + registrar.interval, registrar.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        registrar.register().await;
                    }
                    _ = token.cancelled() => {
                        info!("registry heartbeat stopped");
                        break;
                    }
                }
            }
        });

        TaskHandle::new("registrar", shutdown, handle)
    }
}
