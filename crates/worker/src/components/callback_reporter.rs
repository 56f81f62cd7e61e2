use std::sync::Arc;
use std::time::Duration;

use executor_domain::CallbackParam;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::admin_client::AdminClient;
use super::background::TaskHandle;

/// 周期性地把回调队列中的结果批量上报给调度中心
pub struct CallbackReporter {
    client: Arc<AdminClient>,
    queue: mpsc::Receiver<CallbackParam>,
    interval: Duration,
}

impl CallbackReporter {
    pub fn new(
        client: Arc<AdminClient>,
        queue: mpsc::Receiver<CallbackParam>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            queue,
            interval,
        }
    }

    pub fn start(self) -> TaskHandle {
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(self.run(shutdown.clone()));
        TaskHandle::new("callback-reporter", shutdown, handle)
    }

    async fn run(mut self, shutdown: CancellationToken) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.flush().await,
                _ = shutdown.cancelled() => {
                    // 退出前把已经入队的结果发出去
                    self.flush().await;
                    info!("callback reporter stopped");
                    break;
                }
            }
        }
    }

    /// 一次取空当前队列中的所有结果并作为一批发送，失败不重试
    async fn flush(&mut self) {
        let batch = drain(&mut self.queue);
        if batch.is_empty() {
            return;
        }
        debug!("reporting {} job results", batch.len());
        if let Err(e) = self.client.callback(&batch).await {
            error!("failed to report {} job results: {}", batch.len(), e);
        }
    }
}

fn drain(queue: &mut mpsc::Receiver<CallbackParam>) -> Vec<CallbackParam> {
    let mut batch = Vec::new();
    while let Ok(param) = queue.try_recv() {
        batch.push(param);
    }
    batch
}
