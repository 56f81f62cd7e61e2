use serde::{Deserialize, Deserializer, Serialize};

use crate::value_objects::{BlockStrategy, JobParam};

/// 调度中心的 Java 实现可能把缺省字段写成 `null`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/* 执行器调用调度中心时使用的参数 */

/// 执行器注册/注销参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryParam {
    pub registry_group: String,
    pub registry_key: String,
    pub registry_value: String,
}

impl RegistryParam {
    pub const EXECUTOR_GROUP: &'static str = "EXECUTOR";

    pub fn executor(app_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            registry_group: Self::EXECUTOR_GROUP.to_string(),
            registry_key: app_name.into(),
            registry_value: address.into(),
        }
    }
}

/// 任务执行结果回调参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParam {
    #[serde(rename = "logId")]
    pub log_id: i64,
    /// 毫秒时间戳。字段名沿用调度中心协议中的拼写
    #[serde(rename = "logDateTim")]
    pub log_date_time: i64,
    #[serde(rename = "handleCode")]
    pub handle_code: i32,
    #[serde(rename = "handleMsg", default, deserialize_with = "null_as_default")]
    pub handle_msg: String,
}

/* 调度中心调用执行器接口时使用的参数 */

/// 忙碌检测参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleBeatParam {
    #[serde(default)]
    pub job_id: i64,
}

/// 终止任务参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillParam {
    #[serde(default)]
    pub job_id: i64,
}

/// 查询日志参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogParam {
    #[serde(rename = "logId", default)]
    pub log_id: i64,
    #[serde(rename = "logDateTim", default)]
    pub log_date_time: i64,
    #[serde(rename = "fromLineNum", default)]
    pub from_line_num: i32,
}

/// 日志查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogResult {
    pub from_line_num: i32,
    pub to_line_num: i32,
    pub log_content: String,
    pub is_end: bool,
}

impl LogResult {
    /// 执行器不对外提供日志内容，固定返回日志已结束
    pub fn not_available() -> Self {
        Self {
            from_line_num: 1,
            to_line_num: 2,
            log_content: "N/A".to_string(),
            is_end: true,
        }
    }
}

/// 触发任务参数
///
/// GLUE 相关字段只做接收，执行器不会执行远程下发的脚本。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunParam {
    pub job_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub executor_handler: String,
    #[serde(deserialize_with = "null_as_default")]
    pub executor_params: String,
    pub executor_block_strategy: BlockStrategy,
    /// 超时时间（秒），0 表示不限制
    #[serde(deserialize_with = "null_as_default")]
    pub executor_timeout: i64,
    pub log_id: i64,
    /// 毫秒时间戳
    #[serde(deserialize_with = "null_as_default")]
    pub log_date_time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub glue_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub glue_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub glue_updatetime: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub broadcast_index: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub broadcast_total: i32,
}

impl RunParam {
    pub fn job_param(&self) -> JobParam {
        JobParam {
            params: self.executor_params.clone(),
            sharding_index: self.broadcast_index,
            sharding_total: self.broadcast_total,
        }
    }
}
