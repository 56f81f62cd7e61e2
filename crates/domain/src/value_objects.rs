use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 阻塞处理策略：同一个jobId已有任务在运行时，如何处理新的触发请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockStrategy {
    /// 单机串行（默认）：新任务等待旧任务结束后再运行
    #[default]
    SerialExecution,
    /// 丢弃后续调度：旧任务仍在运行时直接拒绝新请求
    DiscardLater,
    /// 覆盖之前调度：终止旧任务，然后运行新任务
    CoverEarly,
}

impl BlockStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockStrategy::SerialExecution => "SERIAL_EXECUTION",
            BlockStrategy::DiscardLater => "DISCARD_LATER",
            BlockStrategy::CoverEarly => "COVER_EARLY",
        }
    }
}

impl fmt::Display for BlockStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockStrategy {
    type Err = std::convert::Infallible;

    /// 未知的策略名按默认的串行策略处理
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DISCARD_LATER" => BlockStrategy::DiscardLater,
            "COVER_EARLY" => BlockStrategy::CoverEarly,
            _ => BlockStrategy::SerialExecution,
        })
    }
}

impl Serialize for BlockStrategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockStrategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}

/// 传递给任务处理器的参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParam {
    pub params: String,
    pub sharding_index: i32,
    pub sharding_total: i32,
}
