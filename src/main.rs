use anyhow::{Context, Result};
use clap::{value_parser, Arg, Command};
use executor_config::AppConfig;
use executor_worker::Executor;
use tracing::{error, info};

use xxljob_executor::common::{init_logging, LOG_FORMATS};
use xxljob_executor::handlers::demo_handlers;
use xxljob_executor::{wait_for_shutdown_signal, Application, ShutdownManager};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("xxljob-executor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("xxl-job 执行器")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径，未指定时查找默认路径"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(LOG_FORMATS),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("HTTP服务端口")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("app-name")
                .long("app-name")
                .value_name("NAME")
                .help("执行器AppName"),
        )
        .arg(
            Arg::new("admin-address")
                .long("admin-address")
                .value_name("URL")
                .help("调度中心地址"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let mut config = AppConfig::load(config_path).context("加载配置失败")?;

    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(app_name) = matches.get_one::<String>("app-name") {
        config.executor.app_name = app_name.clone();
    }
    if let Some(address) = matches.get_one::<String>("admin-address") {
        config.admin.address = address.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.clone();
    }

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    )?;

    info!("启动xxl-job执行器: {}", config.executor.app_name);
    info!("调度中心: {}", config.admin.base_url());

    let signals = config.server.interrupt_signals.clone();
    let executor = demo_handlers()
        .into_iter()
        .fold(Executor::builder(config), |builder, (name, handler)| {
            builder.handler(name, handler)
        })
        .build()
        .context("创建执行器失败")?;

    let app = Application::bind(executor).await?;
    let shutdown_manager = ShutdownManager::new();
    let shutdown_rx = shutdown_manager.subscribe().await;
    let mut app_handle = tokio::spawn(app.run(shutdown_rx));

    let mut signal_error = None;
    let exited = tokio::select! {
        res = &mut app_handle => Some(res),
        signal = wait_for_shutdown_signal(&signals) => {
            match signal {
                Ok(_) => info!("收到关闭信号，开始优雅关闭..."),
                Err(e) => {
                    error!("安装关闭信号处理器失败，停止执行器: {:#}", e);
                    signal_error = Some(e);
                }
            }
            None
        }
    };

    let result = match exited {
        Some(res) => res,
        None => {
            shutdown_manager.shutdown().await;
            app_handle.await
        }
    };
    if let Some(e) = signal_error {
        return Err(e.context("等待关闭信号失败"));
    }
    result.context("应用任务异常")??;

    info!("xxl-job执行器已退出");
    Ok(())
}
