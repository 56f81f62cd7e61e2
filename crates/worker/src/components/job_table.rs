use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::job::Job;

/// jobId → 正在运行的 Job
///
/// 同一个 jobId 同一时刻最多只有一个 Job 占用表项。
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: DashMap<i64, Arc<Job>>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: i64) -> Option<Arc<Job>> {
        self.jobs.get(&job_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, job_id: i64) -> bool {
        self.jobs.contains_key(&job_id)
    }

    /// 表项空闲时占用并返回 true，已被占用时返回 false
    pub fn try_occupy(&self, job: &Arc<Job>) -> bool {
        match self.jobs.entry(job.id) {
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(job));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn remove(&self, job_id: i64) -> Option<Arc<Job>> {
        self.jobs.remove(&job_id).map(|(_, job)| job)
    }

    /// 只有表项仍是这个实例时才删除，避免误删同一 jobId 的后继任务
    pub fn remove_instance(&self, job: &Arc<Job>) -> bool {
        self.jobs
            .remove_if(&job.id, |_, current| Arc::ptr_eq(current, job))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Arc<Job>> {
        self.jobs.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}
