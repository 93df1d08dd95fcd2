//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGenerator、ImageGenerator、JobManager、进度回调）
//! - services: 叙事服务与配图服务
//! - commands: 故事生成（编排器）与任务提交
//! - queries: 任务状态查询
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use commands::{
    GenerateStoryCommand, SubmitStoryJobCommand, SubmitStoryJobResponse,
    handlers::{GenerateStoryHandler, StorySettings, SubmitStoryJobHandler},
};

pub use error::{ApplicationError, NarrativeGenerationError};

pub use ports::{
    // Image generator
    GenerationId,
    GenerationStatus,
    ImageGenerationError,
    ImageGenerationRequest,
    ImageGeneratorPort,
    // Job manager
    JobError,
    JobManagerPort,
    JobState,
    StoryJob,
    // Progress
    NoProgress,
    StoryProgress,
    // Text generator
    TextGenerationError,
    TextGenerationRequest,
    TextGeneratorPort,
};

pub use queries::{handlers::GetStoryJobHandler, GetStoryJob, StoryJobStatus};

pub use services::{IllustrationService, IllustrationSettings, NarrativeService, NarrativeSettings};
