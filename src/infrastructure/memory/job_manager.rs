//! In-Memory Job Manager Implementation

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::application::ports::{JobError, JobManagerPort, JobState, StoryJob};
use crate::domain::story::Story;

/// 内存任务管理器
pub struct InMemoryJobManager {
    /// job_id -> StoryJob
    jobs: DashMap<String, StoryJob>,
    /// 任务队列发送端
    queue_sender: mpsc::Sender<String>,
}

impl InMemoryJobManager {
    pub fn new(queue_sender: mpsc::Sender<String>) -> Self {
        Self {
            jobs: DashMap::new(),
            queue_sender,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn update<F>(&self, job_id: &str, f: F) -> Result<(), JobError>
    where
        F: FnOnce(&mut StoryJob),
    {
        let mut job = self
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;
        f(job.value_mut());
        job.updated_at = Utc::now();
        Ok(())
    }
}

impl JobManagerPort for InMemoryJobManager {
    fn submit(&self, job: StoryJob) -> Result<String, JobError> {
        let job_id = job.job_id.clone();
        self.jobs.insert(job_id.clone(), job);

        // 入队失败时撤销登记，避免留下永远 pending 的任务
        if let Err(e) = self.queue_sender.try_send(job_id.clone()) {
            self.jobs.remove(&job_id);
            tracing::warn!(job_id = %job_id, error = %e, "Failed to enqueue job");
            return Err(match e {
                TrySendError::Full(_) => JobError::QueueFull,
                TrySendError::Closed(_) => JobError::QueueClosed,
            });
        }

        tracing::debug!(job_id = %job_id, "Job submitted");
        Ok(job_id)
    }

    fn get_job(&self, job_id: &str) -> Option<StoryJob> {
        self.jobs.get(job_id).map(|j| j.clone())
    }

    fn set_state(&self, job_id: &str, state: JobState) -> Result<(), JobError> {
        self.update(job_id, |job| {
            let old_state = job.state;
            job.state = state;
            if state.is_finished() {
                job.completed_at = Some(Utc::now());
            }
            tracing::debug!(
                job_id = %job_id,
                old_state = ?old_state,
                new_state = ?state,
                "Job state changed"
            );
        })
    }

    fn set_progress(
        &self,
        job_id: &str,
        current_scene: u32,
        total_scenes: u32,
    ) -> Result<(), JobError> {
        self.update(job_id, |job| {
            job.current_scene = Some(current_scene);
            job.total_scenes = Some(total_scenes);
        })
    }

    fn complete(&self, job_id: &str, story: Story) -> Result<(), JobError> {
        self.update(job_id, |job| {
            job.state = JobState::Completed;
            job.story = Some(story);
            job.completed_at = Some(Utc::now());
        })
    }

    fn set_failed(&self, job_id: &str, error: String) -> Result<(), JobError> {
        self.update(job_id, |job| {
            job.state = JobState::Failed;
            job.error_message = Some(error);
            job.completed_at = Some(Utc::now());
        })
    }

    fn purge_finished(&self, older_than: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|_, job| {
            !(job.state.is_finished()
                && job.completed_at.map(|t| t <= older_than).unwrap_or(false))
        });
        let purged = before.saturating_sub(self.jobs.len());

        if purged > 0 {
            tracing::debug!(purged, "Finished jobs purged");
        }
        purged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::StoryBrief;

    fn job() -> StoryJob {
        StoryJob::new(StoryBrief::new("a fox in the snow", "Adventure", "Serious", 2, 10).unwrap())
    }

    #[tokio::test]
    async fn test_job_lifecycle() {
        let (tx, mut rx) = mpsc::channel(10);
        let manager = InMemoryJobManager::new(tx);

        let job = job();
        let job_id = manager.submit(job).unwrap();

        // Check queue
        assert_eq!(rx.try_recv().unwrap(), job_id);
        assert_eq!(manager.get_job(&job_id).unwrap().state, JobState::Pending);

        manager.set_state(&job_id, JobState::Narrating).unwrap();
        manager.set_state(&job_id, JobState::Illustrating).unwrap();
        manager.set_progress(&job_id, 1, 2).unwrap();

        let snapshot = manager.get_job(&job_id).unwrap();
        assert_eq!(snapshot.state, JobState::Illustrating);
        assert_eq!(snapshot.current_scene, Some(1));
        assert_eq!(snapshot.total_scenes, Some(2));
        assert!(snapshot.completed_at.is_none());

        manager.complete(&job_id, Story::new("Fox", Vec::new())).unwrap();
        let snapshot = manager.get_job(&job_id).unwrap();
        assert_eq!(snapshot.state, JobState::Completed);
        assert_eq!(snapshot.story.unwrap().title(), "Fox");
        assert!(snapshot.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let (tx, _rx) = mpsc::channel(10);
        let manager = InMemoryJobManager::new(tx);

        assert!(manager.get_job("missing").is_none());
        assert!(matches!(
            manager.set_state("missing", JobState::Failed),
            Err(JobError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_full_queue_rejects_and_unregisters() {
        let (tx, _rx) = mpsc::channel(1);
        let manager = InMemoryJobManager::new(tx);

        manager.submit(job()).unwrap();
        assert!(matches!(manager.submit(job()), Err(JobError::QueueFull)));
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_queue() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let manager = InMemoryJobManager::new(tx);

        assert!(matches!(manager.submit(job()), Err(JobError::QueueClosed)));
        assert!(manager.is_empty());
    }

    #[tokio::test]
    async fn test_purge_only_finished_jobs() {
        let (tx, _rx) = mpsc::channel(10);
        let manager = InMemoryJobManager::new(tx);

        let running = manager.submit(job()).unwrap();
        let failed = manager.submit(job()).unwrap();
        manager.set_failed(&failed, "boom".to_string()).unwrap();

        // 截止时间在未来：所有已结束任务都算过期
        let purged = manager.purge_finished(Utc::now() + chrono::Duration::seconds(1));
        assert_eq!(purged, 1);
        assert!(manager.get_job(&running).is_some());
        assert!(manager.get_job(&failed).is_none());
    }
}
