use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use executor_config::AppConfig;
use executor_domain::{CallbackParam, RegistryParam};
use executor_worker::{handler_fn, Executor, JobContext, JobParam};
use serde_json::{json, Value};
use xxljob_executor::handlers::demo_handlers;
use xxljob_executor::{Application, ShutdownManager};

#[derive(Clone, Default)]
struct AdminState {
    registrations: Arc<Mutex<Vec<RegistryParam>>>,
    removals: Arc<Mutex<Vec<RegistryParam>>>,
    callbacks: Arc<Mutex<Vec<CallbackParam>>>,
}

async fn spawn_admin(state: AdminState) -> String {
    async fn registry(State(s): State<AdminState>, Json(p): Json<RegistryParam>) -> Json<Value> {
        s.registrations.lock().unwrap().push(p);
        Json(json!({"code": 200, "msg": null}))
    }
    async fn remove(State(s): State<AdminState>, Json(p): Json<RegistryParam>) -> Json<Value> {
        s.removals.lock().unwrap().push(p);
        Json(json!({"code": 200, "msg": null}))
    }
    async fn callback(
        State(s): State<AdminState>,
        Json(p): Json<Vec<CallbackParam>>,
    ) -> Json<Value> {
        s.callbacks.lock().unwrap().extend(p);
        Json(json!({"code": 200, "msg": null}))
    }

    let app = Router::new()
        .route("/xxl-job-admin/api/registry", post(registry))
        .route("/xxl-job-admin/api/registryRemove", post(remove))
        .route("/xxl-job-admin/api/callback", post(callback))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/xxl-job-admin")
}

fn config(admin: String, logs: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.executor.app_name = "integration-executor".to_string();
    config.executor.ip = Some("127.0.0.1".to_string());
    config.executor.serial_poll_interval_ms = 20;
    config.admin.address = admin;
    config.admin.callback_interval_ms = 50;
    config.server.bind_host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.wait_timeout_seconds = 2;
    config.job_log.dir = logs.to_path_buf();
    config
}

async fn eventually(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not met in time");
}

async fn post_json(client: &reqwest::Client, addr: SocketAddr, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("http://{addr}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.unwrap()
}

fn run_body(job_id: i64, log_id: i64, handler: &str, strategy: &str, timeout: i64) -> Value {
    json!({
        "jobId": job_id,
        "executorHandler": handler,
        "executorParams": format!("param-{log_id}"),
        "executorBlockStrategy": strategy,
        "executorTimeout": timeout,
        "logId": log_id,
        "logDateTime": 0,
        "glueType": "BEAN",
        "glueSource": null,
        "glueUpdatetime": 0,
        "broadcastIndex": 0,
        "broadcastTotal": 1
    })
}

#[tokio::test]
async fn test_executor_end_to_end() {
    let admin = AdminState::default();
    let admin_address = spawn_admin(admin.clone()).await;
    let logs = tempfile::TempDir::new().unwrap();

    let executor = Executor::builder(config(admin_address, logs.path()))
        .handler(
            "wait",
            handler_fn(|ctx: JobContext, _param: JobParam| async move {
                ctx.cancelled().await;
                anyhow::bail!("context canceled")
            }),
        )
        .build()
        .unwrap();
    for (name, handler) in demo_handlers() {
        executor.register_handler(name, handler);
    }

    let app = Application::bind(Arc::clone(&executor)).await.unwrap();
    let addr = app.local_addr().unwrap();
    let shutdown = ShutdownManager::new();
    let handle = tokio::spawn(app.run(shutdown.subscribe().await));

    // 启动时立即注册
    eventually(|| !admin.registrations.lock().unwrap().is_empty()).await;

    let client = reqwest::Client::new();
    let beat = post_json(&client, addr, "/beat", json!({})).await;
    assert_eq!(beat["code"], 200);

    let res = post_json(
        &client,
        addr,
        "/run",
        run_body(1, 101, "demoJobHandler", "SERIAL_EXECUTION", 0),
    )
    .await;
    assert_eq!(res["code"], 200);
    eventually(|| admin.callbacks.lock().unwrap().len() == 1).await;
    {
        let callbacks = admin.callbacks.lock().unwrap();
        assert_eq!(callbacks[0].log_id, 101);
        assert_eq!(callbacks[0].handle_code, 200);
        assert_eq!(callbacks[0].handle_msg, "OK");
    }

    // 超时的任务上报失败
    let res = post_json(&client, addr, "/run", run_body(2, 201, "wait", "", 1)).await;
    assert_eq!(res["code"], 200);
    eventually(|| admin.callbacks.lock().unwrap().len() == 2).await;
    {
        let callbacks = admin.callbacks.lock().unwrap();
        assert_eq!(callbacks[1].log_id, 201);
        assert_eq!(callbacks[1].handle_code, 500);
        assert_eq!(callbacks[1].handle_msg, "context canceled");
    }

    // 被终止的任务同样回调失败结果
    let res = post_json(&client, addr, "/run", run_body(3, 301, "wait", "", 0)).await;
    assert_eq!(res["code"], 200);
    eventually(|| executor.job_table().contains(3)).await;
    let idle = post_json(&client, addr, "/idleBeat", json!({"jobId": 3})).await;
    assert_eq!(idle["code"], 500);
    assert_eq!(idle["msg"], "job is running");
    let kill = post_json(&client, addr, "/kill", json!({"jobId": 3})).await;
    assert_eq!(kill["code"], 200);
    eventually(|| admin.callbacks.lock().unwrap().len() == 3).await;
    assert_eq!(admin.callbacks.lock().unwrap()[2].log_id, 301);

    let log = post_json(
        &client,
        addr,
        "/log",
        json!({"logId": 101, "logDateTim": 0, "fromLineNum": 1}),
    )
    .await;
    assert_eq!(log["content"]["logContent"], "N/A");
    assert_eq!(log["content"]["isEnd"], true);

    shutdown.shutdown().await;
    handle.await.unwrap().unwrap();

    let removals = admin.removals.lock().unwrap().clone();
    assert_eq!(removals.len(), 1);
    assert_eq!(removals[0].registry_key, "integration-executor");
    assert!(executor.is_stopped());
    assert!(executor.job_table().is_empty());
}

#[tokio::test]
async fn test_bind_failure_is_startup_error() {
    let logs = tempfile::TempDir::new().unwrap();
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = occupied.local_addr().unwrap().port();

    let mut cfg = config("http://127.0.0.1:1/xxl-job-admin".to_string(), logs.path());
    cfg.server.port = port;
    let executor = Executor::builder(cfg).build().unwrap();

    assert!(Application::bind(Arc::clone(&executor)).await.is_err());
    executor.stop().await;
}
