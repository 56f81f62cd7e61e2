mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{eventually, FakeAdmin};
use executor_config::AppConfig;
use executor_domain::{BlockStrategy, RunParam};
use executor_worker::{handler_fn, Executor, JobContext, JobParam};
use tokio::sync::Notify;

fn config(admin_address: String, log_dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.executor.app_name = "executor-test".to_string();
    config.executor.ip = Some("127.0.0.1".to_string());
    config.executor.serial_poll_interval_ms = 20;
    config.admin.address = admin_address;
    config.admin.callback_interval_ms = 50;
    config.admin.register_interval_ms = 100;
    config.server.port = 19999;
    config.job_log.dir = log_dir.to_path_buf();
    config
}

fn run(job_id: i64, log_id: i64, handler: &str, strategy: BlockStrategy) -> RunParam {
    RunParam {
        job_id,
        log_id,
        executor_handler: handler.to_string(),
        executor_params: format!("log-{log_id}"),
        executor_block_strategy: strategy,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_registry_heartbeat_and_deregister() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let executor = Executor::builder(config(address, logs.path())).build().unwrap();

    assert_eq!(
        executor.registry_param().registry_value,
        "http://127.0.0.1:19999"
    );
    assert!(executor.register().await);
    // 心跳周期性重新注册
    eventually(|| admin.registrations().len() >= 3).await;
    assert!(admin
        .registrations()
        .iter()
        .all(|p| p.registry_key == "executor-test" && p.registry_group == "EXECUTOR"));

    executor.stop().await;
    assert_eq!(admin.removals().len(), 1);

    // 停止后不再注册，重复 stop 是空操作
    let count = admin.registrations().len();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(admin.registrations().len(), count);
    executor.stop().await;
    assert_eq!(admin.removals().len(), 1);
}

#[tokio::test]
async fn test_results_are_reported_in_batches() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let executor = Executor::builder(config(address, logs.path()))
        .handler("ok", handler_fn(|_ctx, _param| async { Ok(()) }))
        .handler(
            "fail",
            handler_fn(|_ctx, param: JobParam| async move {
                anyhow::bail!("failed with {}", param.params)
            }),
        )
        .build()
        .unwrap();

    executor
        .trigger_job(&run(1, 11, "ok", BlockStrategy::SerialExecution))
        .unwrap();
    executor
        .trigger_job(&run(2, 22, "fail", BlockStrategy::SerialExecution))
        .unwrap();

    eventually(|| admin.callbacks().len() == 2).await;
    let mut callbacks = admin.callbacks();
    callbacks.sort_by_key(|cb| cb.log_id);
    assert_eq!(callbacks[0].handle_code, 200);
    assert_eq!(callbacks[0].handle_msg, "OK");
    assert_eq!(callbacks[1].handle_code, 500);
    assert_eq!(callbacks[1].handle_msg, "failed with log-22");

    assert!(executor.job_table().is_empty());
    executor.stop().await;
}

#[tokio::test]
async fn test_stop_cancels_jobs_and_flushes_results() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let mut cfg = config(address, logs.path());
    // 回调间隔足够长，结果只能由停止时的最后一次上报发出
    cfg.admin.callback_interval_ms = 60_000;

    let started = Arc::new(Notify::new());
    let notify = Arc::clone(&started);
    let executor = Executor::builder(cfg)
        .handler(
            "long",
            handler_fn(move |ctx: JobContext, _param| {
                let notify = Arc::clone(&notify);
                async move {
                    notify.notify_one();
                    ctx.cancelled().await;
                    anyhow::bail!("context canceled")
                }
            }),
        )
        .build()
        .unwrap();

    executor
        .trigger_job(&run(7, 70, "long", BlockStrategy::SerialExecution))
        .unwrap();
    started.notified().await;
    assert!(executor.idle_beat(7).is_err());

    assert!(executor.kill_job(7));
    assert!(executor.idle_beat(7).is_ok());

    executor.stop().await;
    let callbacks = admin.callbacks();
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].log_id, 70);
    assert_eq!(callbacks[0].handle_code, 500);
    assert_eq!(callbacks[0].handle_msg, "context canceled");
}

#[tokio::test]
async fn test_stop_reports_results_of_running_jobs() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let mut cfg = config(address, logs.path());
    cfg.admin.callback_interval_ms = 60_000;
    cfg.server.wait_timeout_seconds = 5;

    let started = Arc::new(Notify::new());
    let notify = Arc::clone(&started);
    let executor = Executor::builder(cfg)
        .handler(
            "long",
            handler_fn(move |ctx: JobContext, _param| {
                let notify = Arc::clone(&notify);
                async move {
                    notify.notify_one();
                    ctx.cancelled().await;
                    // 收到取消后还需要一点时间收尾
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    anyhow::bail!("context canceled")
                }
            }),
        )
        .build()
        .unwrap();

    executor
        .trigger_job(&run(8, 80, "long", BlockStrategy::SerialExecution))
        .unwrap();
    started.notified().await;

    // 不先 kill，直接停止执行器
    executor.stop().await;

    let callbacks = admin.callbacks();
    assert_eq!(callbacks.len(), 1);
    assert_eq!(callbacks[0].log_id, 80);
    assert_eq!(callbacks[0].handle_code, 500);
    assert_eq!(callbacks[0].handle_msg, "context canceled");
    assert!(executor.job_table().is_empty());
}

#[tokio::test]
async fn test_job_log_file_written() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let executor = Executor::builder(config(address, logs.path()))
        .handler(
            "echo",
            handler_fn(|ctx: JobContext, param: JobParam| async move {
                ctx.log_info(format!("echo {}", param.params));
                Ok(())
            }),
        )
        .build()
        .unwrap();

    executor
        .trigger_job(&run(3, 33, "echo", BlockStrategy::SerialExecution))
        .unwrap();
    eventually(|| admin.callbacks().len() == 1).await;

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let content = std::fs::read_to_string(logs.path().join(today).join("33.log")).unwrap();
    assert!(content.contains("job start: id=3 logId=33 handler=echo params=log-33"));
    assert!(content.contains("echo log-33"));
    assert!(content.contains("job success"));
    executor.stop().await;
}

#[tokio::test]
async fn test_handler_registration_at_runtime() {
    let admin = FakeAdmin::default();
    let address = admin.spawn().await;
    let logs = tempfile::TempDir::new().unwrap();
    let executor = Executor::builder(config(address, logs.path())).build().unwrap();

    let err = executor
        .trigger_job(&run(1, 1, "late", BlockStrategy::SerialExecution))
        .unwrap_err();
    assert_eq!(err.to_string(), "job handler not found");

    executor.register_handler("late", handler_fn(|_ctx, _param| async { Ok(()) }));
    executor
        .trigger_job(&run(1, 2, "late", BlockStrategy::SerialExecution))
        .unwrap();
    eventually(|| admin.callbacks().len() == 1).await;

    assert!(executor.remove_handler("late"));
    assert!(!executor.handlers().contains("late"));
    executor.stop().await;
}
