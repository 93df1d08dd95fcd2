//! Job Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::JobManagerPort;
use crate::application::queries::{GetStoryJob, StoryJobStatus};

/// GetStoryJob Handler
pub struct GetStoryJobHandler {
    job_manager: Arc<dyn JobManagerPort>,
}

impl GetStoryJobHandler {
    pub fn new(job_manager: Arc<dyn JobManagerPort>) -> Self {
        Self { job_manager }
    }

    pub fn handle(&self, query: GetStoryJob) -> Result<StoryJobStatus, ApplicationError> {
        let job = self
            .job_manager
            .get_job(&query.job_id)
            .ok_or_else(|| ApplicationError::not_found("Job", &query.job_id))?;

        Ok(StoryJobStatus {
            job_id: job.job_id,
            state: job.state,
            current_scene: job.current_scene,
            total_scenes: job.total_scenes,
            story: job.story,
            error: job.error_message,
        })
    }
}
