use std::sync::Arc;

use executor_domain::{BlockStrategy, RunParam};

use super::job::Job;

/// 触发请求的准入结果
#[derive(Debug)]
pub enum Admission {
    /// 创建新任务（串行策略下可能需要等待旧任务结束）
    Proceed,
    /// 先终止旧任务，再创建新任务
    Cover(Arc<Job>),
    /// 调度中心重复下发了同一个 logId
    RejectDuplicate,
    /// 丢弃后续调度
    RejectBusy(Arc<Job>),
}

/// 根据当前占用表项的任务和阻塞策略决定如何处理触发请求
pub fn resolve(incumbent: Option<Arc<Job>>, run: &RunParam) -> Admission {
    let Some(incumbent) = incumbent else {
        return Admission::Proceed;
    };

    if incumbent.log_id == run.log_id {
        return Admission::RejectDuplicate;
    }

    match run.executor_block_strategy {
        BlockStrategy::DiscardLater => Admission::RejectBusy(incumbent),
        BlockStrategy::CoverEarly => Admission::Cover(incumbent),
        BlockStrategy::SerialExecution => Admission::Proceed,
    }
}
