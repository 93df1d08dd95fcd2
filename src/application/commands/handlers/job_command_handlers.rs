//! Job Command Handlers - 异步故事任务

use std::sync::Arc;

use crate::application::commands::{SubmitStoryJobCommand, SubmitStoryJobResponse};
use crate::application::error::ApplicationError;
use crate::application::ports::{JobManagerPort, StoryJob};

/// SubmitStoryJob Handler - 校验简报并放入任务队列
pub struct SubmitStoryJobHandler {
    job_manager: Arc<dyn JobManagerPort>,
    max_scenes: u32,
}

impl SubmitStoryJobHandler {
    pub fn new(job_manager: Arc<dyn JobManagerPort>, max_scenes: u32) -> Self {
        Self {
            job_manager,
            max_scenes,
        }
    }

    pub fn handle(
        &self,
        cmd: SubmitStoryJobCommand,
    ) -> Result<SubmitStoryJobResponse, ApplicationError> {
        let brief = cmd.story.into_brief(self.max_scenes)?;
        let job = StoryJob::new(brief);
        let state = job.state;

        let job_id = self.job_manager.submit(job)?;

        tracing::info!(job_id = %job_id, "Story job submitted");

        Ok(SubmitStoryJobResponse { job_id, state })
    }
}
