use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use executor_api::create_app;
use executor_worker::Executor;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// 执行器进程：HTTP 服务 + 执行器后台任务
pub struct Application {
    executor: Arc<Executor>,
    listener: TcpListener,
    wait_timeout: Duration,
}

impl Application {
    /// 绑定监听地址，绑定失败是启动错误
    pub async fn bind(executor: Arc<Executor>) -> Result<Self> {
        let server = &executor.config().server;
        let bind_address = server.bind_address();
        let wait_timeout = server.wait_timeout();
        let listener = TcpListener::bind(&bind_address)
            .await
            .with_context(|| format!("绑定监听地址失败: {bind_address}"))?;

        Ok(Self {
            executor,
            listener,
            wait_timeout,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("获取监听地址失败")
    }

    pub fn executor(&self) -> &Arc<Executor> {
        &self.executor
    }

    /// 运行直到收到关闭信号，然后在等待时间内完成处理中的请求并停止执行器
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let Self {
            executor,
            listener,
            wait_timeout,
        } = self;

        if !executor.register().await {
            warn!("向调度中心注册失败，继续启动");
        }

        let local_addr = listener.local_addr().context("获取监听地址失败")?;
        info!("执行器HTTP服务监听: {}", local_addr);

        let mut graceful_rx = shutdown_rx.resubscribe();
        let server = axum::serve(listener, create_app(Arc::clone(&executor)))
            .with_graceful_shutdown(async move {
                let _ = graceful_rx.recv().await;
            });
        let mut server = tokio::spawn(async move { server.await });

        let finished = tokio::select! {
            res = &mut server => Some(res),
            _ = shutdown_rx.recv() => None,
        };
        let result = match finished {
            Some(res) => flatten(res),
            None => {
                info!("等待处理中的请求完成（超时: {:?}）", wait_timeout);
                match tokio::time::timeout(wait_timeout, &mut server).await {
                    Ok(res) => flatten(res),
                    Err(_) => {
                        warn!("HTTP服务关闭超时，强制退出");
                        server.abort();
                        Ok(())
                    }
                }
            }
        };

        executor.stop().await;
        if let Err(e) = &result {
            error!("HTTP服务异常退出: {:#}", e);
        }
        result
    }
}

fn flatten(res: Result<std::io::Result<()>, tokio::task::JoinError>) -> Result<()> {
    res.context("HTTP服务任务异常")?
        .context("HTTP服务运行失败")
}
