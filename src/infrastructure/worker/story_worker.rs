//! Story Worker - Background Story Job Processor

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::application::ports::{JobManagerPort, JobState, StoryProgress};
use crate::application::GenerateStoryHandler;
use crate::domain::story::FinishedScene;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct StoryWorkerConfig {
    /// 最大并发故事任务数
    pub max_concurrent: usize,
}

impl Default for StoryWorkerConfig {
    fn default() -> Self {
        Self { max_concurrent: 2 }
    }
}

/// 故事 Worker
///
/// 后台任务处理器，从队列消费 job_id 并运行编排器
pub struct StoryWorker {
    config: StoryWorkerConfig,
    queue_receiver: mpsc::Receiver<String>,
    job_manager: Arc<dyn JobManagerPort>,
    story_handler: Arc<GenerateStoryHandler>,
}

/// 把编排器的进度写回任务登记表
struct JobProgress<'a> {
    job_id: &'a str,
    job_manager: &'a dyn JobManagerPort,
}

impl StoryProgress for JobProgress<'_> {
    fn narrative_started(&self) {
        let _ = self.job_manager.set_state(self.job_id, JobState::Narrating);
    }

    fn narrative_ready(&self, _title: &str, scene_count: usize) {
        let _ = self.job_manager.set_state(self.job_id, JobState::Illustrating);
        let _ = self
            .job_manager
            .set_progress(self.job_id, 0, scene_count as u32);
    }

    fn scene_started(&self, scene_number: u32, total: usize) {
        let _ = self
            .job_manager
            .set_progress(self.job_id, scene_number, total as u32);
    }

    fn scene_finished(&self, scene: &FinishedScene) {
        tracing::debug!(
            job_id = %self.job_id,
            scene = scene.scene_number,
            image_status = scene.image.as_str(),
            "Scene finished"
        );
    }
}

impl StoryWorker {
    pub fn new(
        config: StoryWorkerConfig,
        queue_receiver: mpsc::Receiver<String>,
        job_manager: Arc<dyn JobManagerPort>,
        story_handler: Arc<GenerateStoryHandler>,
    ) -> Self {
        Self {
            config,
            queue_receiver,
            job_manager,
            story_handler,
        }
    }

    /// 启动 Worker
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.config.max_concurrent,
            "StoryWorker started"
        );

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_concurrent));

        while let Some(job_id) = self.queue_receiver.recv().await {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::error!("Failed to acquire semaphore permit");
                    continue;
                }
            };

            let job_manager = self.job_manager.clone();
            let story_handler = self.story_handler.clone();

            tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成
                Self::process_job(&job_id, job_manager, story_handler).await;
            });
        }

        tracing::info!("StoryWorker stopped");
    }

    /// 处理单个任务
    async fn process_job(
        job_id: &str,
        job_manager: Arc<dyn JobManagerPort>,
        story_handler: Arc<GenerateStoryHandler>,
    ) {
        let job = match job_manager.get_job(job_id) {
            Some(j) => j,
            None => {
                tracing::warn!(job_id = %job_id, "Job not found, skipping");
                return;
            }
        };

        let progress = JobProgress {
            job_id,
            job_manager: job_manager.as_ref(),
        };

        match story_handler.generate(&job.brief, &progress).await {
            Ok(story) => {
                tracing::info!(
                    job_id = %job_id,
                    title = %story.title(),
                    scenes = story.scene_count(),
                    "Job completed"
                );
                if let Err(e) = job_manager.complete(job_id, story) {
                    tracing::error!(job_id = %job_id, error = %e, "Failed to store story");
                }
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Job failed");
                let _ = job_manager.set_failed(job_id, e.public_message());
            }
        }
    }
}

/// 定期清理已结束的任务
pub async fn run_job_sweeper(
    job_manager: Arc<dyn JobManagerPort>,
    interval: Duration,
    retention: Duration,
) {
    let retention = match chrono::Duration::from_std(retention) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %e, "Invalid job retention, sweeper disabled");
            return;
        }
    };

    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let purged = job_manager.purge_finished(chrono::Utc::now() - retention);
        if purged > 0 {
            tracing::info!(purged, "Expired story jobs removed");
        }
    }
}
