use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// 后台周期任务的句柄：发出停止信号并等待任务退出
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn new(name: &'static str, shutdown: CancellationToken, handle: JoinHandle<()>) -> Self {
        Self {
            name,
            shutdown,
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            warn!("background task {} exited abnormally: {}", self.name, e);
        }
    }
}
