//! Job Queries

use crate::application::ports::JobState;
use crate::domain::story::Story;

/// 查询故事任务状态
#[derive(Debug, Clone)]
pub struct GetStoryJob {
    pub job_id: String,
}

/// 故事任务状态
#[derive(Debug, Clone)]
pub struct StoryJobStatus {
    pub job_id: String,
    pub state: JobState,
    pub current_scene: Option<u32>,
    pub total_scenes: Option<u32>,
    pub story: Option<Story>,
    pub error: Option<String>,
}
