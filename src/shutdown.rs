use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

/// 优雅关闭管理器
#[derive(Clone)]
pub struct ShutdownManager {
    shutdown_tx: Arc<RwLock<Option<broadcast::Sender<()>>>>,
}

impl ShutdownManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);
        Self {
            shutdown_tx: Arc::new(RwLock::new(Some(shutdown_tx))),
        }
    }

    /// 订阅关闭信号，已关闭时返回立即就绪的接收器
    pub async fn subscribe(&self) -> broadcast::Receiver<()> {
        let shutdown_tx = self.shutdown_tx.read().await;
        if let Some(ref tx) = *shutdown_tx {
            tx.subscribe()
        } else {
            let (tx, rx) = broadcast::channel(1);
            let _ = tx.send(());
            rx
        }
    }

    pub async fn shutdown(&self) {
        let mut shutdown_tx = self.shutdown_tx.write().await;
        let Some(tx) = shutdown_tx.take() else {
            debug!("关闭管理器已经触发过关闭");
            return;
        };
        debug!("发送关闭信号给 {} 个订阅者", tx.receiver_count());
        let _ = tx.send(());
        info!("关闭信号已发送");
    }

    pub async fn is_shutdown(&self) -> bool {
        self.shutdown_tx.read().await.is_none()
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}

/// 等待任一配置的中断信号，返回收到的信号名
#[cfg(unix)]
pub async fn wait_for_shutdown_signal(signals: &[String]) -> Result<String> {
    use futures::future::select_all;
    use tokio::signal::unix::{signal, SignalKind};

    let mut streams = Vec::with_capacity(signals.len());
    for name in signals {
        let kind = match name.as_str() {
            "SIGINT" => SignalKind::interrupt(),
            "SIGQUIT" => SignalKind::quit(),
            "SIGTERM" => SignalKind::terminate(),
            "SIGHUP" => SignalKind::hangup(),
            other => return Err(anyhow::anyhow!("不支持的信号: {other}")),
        };
        let stream = signal(kind).with_context(|| format!("安装{name}信号处理器失败"))?;
        streams.push((name.clone(), stream));
    }
    if streams.is_empty() {
        return Err(anyhow::anyhow!("未配置任何中断信号"));
    }

    let waits = streams.iter_mut().map(|(name, stream)| {
        Box::pin(async move {
            stream.recv().await;
            name.clone()
        })
    });
    let (name, _, _) = select_all(waits).await;
    info!("收到{}信号", name);
    Ok(name)
}

#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal(_signals: &[String]) -> Result<String> {
    tokio::signal::ctrl_c()
        .await
        .context("安装Ctrl+C信号处理器失败")?;
    info!("收到Ctrl+C信号");
    Ok("SIGINT".to_string())
}
