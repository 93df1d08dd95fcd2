//! Story Commands - 故事生成相关命令

use crate::application::error::ApplicationError;
use crate::application::ports::JobState;
use crate::domain::story::StoryBrief;

/// 生成故事命令（同步返回完整故事）
#[derive(Debug, Clone)]
pub struct GenerateStoryCommand {
    pub concept: String,
    pub genre: String,
    pub tone: String,
    pub scene_count: u32,
    pub target_audience: Option<String>,
}

impl GenerateStoryCommand {
    /// 校验并构造简报
    pub fn into_brief(self, max_scenes: u32) -> Result<StoryBrief, ApplicationError> {
        Ok(
            StoryBrief::new(self.concept, self.genre, self.tone, self.scene_count, max_scenes)?
                .with_target_audience(self.target_audience),
        )
    }
}

/// 提交异步故事任务命令
#[derive(Debug, Clone)]
pub struct SubmitStoryJobCommand {
    pub story: GenerateStoryCommand,
}

/// 提交异步故事任务响应
#[derive(Debug, Clone)]
pub struct SubmitStoryJobResponse {
    pub job_id: String,
    pub state: JobState,
}
