#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use executor_domain::{CallbackParam, RegistryParam};
use serde_json::{json, Value};

/// 调度中心的最小实现，记录收到的注册和回调请求
#[derive(Clone, Default)]
pub struct FakeAdmin {
    pub registrations: Arc<Mutex<Vec<RegistryParam>>>,
    pub removals: Arc<Mutex<Vec<RegistryParam>>>,
    pub callbacks: Arc<Mutex<Vec<CallbackParam>>>,
    pub tokens: Arc<Mutex<Vec<String>>>,
    /// 非空时所有接口返回 code=500 和该消息
    pub reject_with: Arc<Mutex<Option<String>>>,
}

impl FakeAdmin {
    /// 在随机端口启动，返回调度中心地址
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/xxl-job-admin/api/registry", post(registry))
            .route("/xxl-job-admin/api/registryRemove", post(registry_remove))
            .route("/xxl-job-admin/api/callback", post(callback))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/xxl-job-admin")
    }

    pub fn callbacks(&self) -> Vec<CallbackParam> {
        self.callbacks.lock().unwrap().clone()
    }

    pub fn registrations(&self) -> Vec<RegistryParam> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn removals(&self) -> Vec<RegistryParam> {
        self.removals.lock().unwrap().clone()
    }

    fn record_token(&self, headers: &HeaderMap) {
        if let Some(token) = headers
            .get("XXL-JOB-ACCESS-TOKEN")
            .and_then(|v| v.to_str().ok())
        {
            self.tokens.lock().unwrap().push(token.to_string());
        }
    }

    fn reply(&self) -> Json<Value> {
        match self.reject_with.lock().unwrap().clone() {
            Some(msg) => Json(json!({"code": 500, "msg": msg})),
            None => Json(json!({"code": 200, "msg": null})),
        }
    }
}

async fn registry(
    State(admin): State<FakeAdmin>,
    headers: HeaderMap,
    Json(param): Json<RegistryParam>,
) -> Json<Value> {
    admin.record_token(&headers);
    admin.registrations.lock().unwrap().push(param);
    admin.reply()
}

async fn registry_remove(
    State(admin): State<FakeAdmin>,
    headers: HeaderMap,
    Json(param): Json<RegistryParam>,
) -> Json<Value> {
    admin.record_token(&headers);
    admin.removals.lock().unwrap().push(param);
    admin.reply()
}

async fn callback(
    State(admin): State<FakeAdmin>,
    headers: HeaderMap,
    Json(params): Json<Vec<CallbackParam>>,
) -> Json<Value> {
    admin.record_token(&headers);
    admin.callbacks.lock().unwrap().extend(params);
    admin.reply()
}

/// 轮询等待条件成立
pub async fn eventually(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("condition not met in time");
}
