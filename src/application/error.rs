//! 应用层错误定义
//!
//! 只有叙事生成失败会穿过编排器边界；配图失败和提示词提炼失败在内部被吸收

use thiserror::Error;

use crate::application::ports::{JobError, TextGenerationError};
use crate::domain::story::StoryError;
use crate::domain::NarrativeParseError;

/// 叙事生成错误
///
/// 文本服务调用失败，或响应无法解析为所需的 JSON 结构。对整个请求是致命的
#[derive(Debug, Error)]
pub enum NarrativeGenerationError {
    #[error("text provider call failed: {0}")]
    Provider(#[from] TextGenerationError),

    #[error("text provider response unusable: {0}")]
    Parse(#[from] NarrativeParseError),
}

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 叙事生成失败
    #[error("Narrative generation failed: {0}")]
    NarrativeGeneration(#[from] NarrativeGenerationError),

    /// 超过整体请求时限
    #[error("Story generation exceeded the {0}s deadline")]
    DeadlineExceeded(u64),

    /// 任务队列不可用
    #[error("Job queue unavailable: {0}")]
    QueueUnavailable(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 面向最终用户的信息
    ///
    /// 不包含服务方的响应体、堆栈或凭据
    pub fn public_message(&self) -> String {
        match self {
            ApplicationError::NotFound { .. } | ApplicationError::ValidationError(_) => {
                self.to_string()
            }
            ApplicationError::NarrativeGeneration(NarrativeGenerationError::Provider(_)) => {
                "Story generation failed: the narrative service is unavailable".to_string()
            }
            ApplicationError::NarrativeGeneration(NarrativeGenerationError::Parse(_)) => {
                "Story generation failed: the narrative service returned an unreadable story"
                    .to_string()
            }
            ApplicationError::DeadlineExceeded(_) => self.to_string(),
            ApplicationError::QueueUnavailable(_) => {
                "Story generation is busy, please retry later".to_string()
            }
        }
    }
}

impl From<StoryError> for ApplicationError {
    fn from(err: StoryError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<JobError> for ApplicationError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound(id) => Self::not_found("Job", id),
            JobError::QueueFull | JobError::QueueClosed => Self::QueueUnavailable(err.to_string()),
        }
    }
}
