//! Text Generator Port - 文本生成服务抽象
//!
//! 聊天/补全式接口：一条自然语言指令 + 采样温度，返回自由文本

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Error)]
pub enum TextGenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unauthorized: check the text provider API key")]
    Unauthorized,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 文本生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    /// 模型标识
    pub model: String,
    /// 完整指令
    pub message: String,
    /// 采样温度，越低越字面
    pub temperature: f32,
}

/// Text Generator Port
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 发送一条指令并返回模型的原始文本
    async fn chat(&self, request: TextGenerationRequest) -> Result<String, TextGenerationError>;
}
