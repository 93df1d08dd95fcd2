//! Image Generator Port - 异步图像生成服务抽象
//!
//! 提交任务立即返回 generation id，之后按 id 轮询结果

use async_trait::async_trait;
use thiserror::Error;

/// 图像生成错误
#[derive(Debug, Error)]
pub enum ImageGenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unauthorized: check the image provider API key")]
    Unauthorized,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 生成任务句柄（服务方返回的不透明 id）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenerationId(String);

impl GenerationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 图像生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
    pub guidance_scale: f32,
    pub alchemy: bool,
}

/// 单次轮询的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    /// 仍在生成
    Pending,
    /// 已完成，包含至少一张图片的 URL
    Complete(Vec<String>),
    /// 服务方报告生成失败
    Failed(String),
}

/// Image Generator Port
#[async_trait]
pub trait ImageGeneratorPort: Send + Sync {
    /// 提交生成任务
    async fn submit(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GenerationId, ImageGenerationError>;

    /// 查询任务状态
    async fn poll(&self, id: &GenerationId) -> Result<GenerationStatus, ImageGenerationError>;
}
