//! Job Manager Port - 异步故事任务管理
//!
//! 定义任务登记表的抽象接口，具体实现在 infrastructure/memory 层

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::story::{Story, StoryBrief};

/// Job Manager 错误
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),

    #[error("Job queue is full")]
    QueueFull,

    #[error("Job queue is closed")]
    QueueClosed,
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// 排队中
    Pending,
    /// 正在生成叙事
    Narrating,
    /// 正在逐个场景配图
    Illustrating,
    /// 完成
    Completed,
    /// 失败
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Narrating => "narrating",
            JobState::Illustrating => "illustrating",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// 故事生成任务
#[derive(Debug, Clone)]
pub struct StoryJob {
    pub job_id: String,
    pub brief: StoryBrief,
    pub state: JobState,
    /// 当前正在处理的场景序号（1-based）
    pub current_scene: Option<u32>,
    /// 叙事生成后得知的场景总数
    pub total_scenes: Option<u32>,
    pub story: Option<Story>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl StoryJob {
    pub fn new(brief: StoryBrief) -> Self {
        let now = Utc::now();
        Self {
            job_id: Uuid::new_v4().to_string(),
            brief,
            state: JobState::Pending,
            current_scene: None,
            total_scenes: None,
            story: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}

/// Job Manager Port
///
/// 管理故事任务的生命周期，所有状态存储在内存中
pub trait JobManagerPort: Send + Sync {
    /// 登记任务并放入队列，返回 job_id
    fn submit(&self, job: StoryJob) -> Result<String, JobError>;

    /// 获取任务快照
    fn get_job(&self, job_id: &str) -> Option<StoryJob>;

    /// 设置任务状态
    fn set_state(&self, job_id: &str, state: JobState) -> Result<(), JobError>;

    /// 更新配图进度
    fn set_progress(&self, job_id: &str, current_scene: u32, total_scenes: u32)
        -> Result<(), JobError>;

    /// 标记完成并保存故事
    fn complete(&self, job_id: &str, story: Story) -> Result<(), JobError>;

    /// 标记失败并记录面向用户的错误信息
    fn set_failed(&self, job_id: &str, error: String) -> Result<(), JobError>;

    /// 清理完成时间不晚于 `older_than` 的已结束任务，返回清理数量
    fn purge_finished(&self, older_than: DateTime<Utc>) -> usize;
}
