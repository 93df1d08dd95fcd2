//! Fake Image Client - 离线开发用的图像生成客户端
//!
//! 提交立即返回 id，轮询若干次后返回一张占位图片 URL

use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{
    GenerationId, GenerationStatus, ImageGenerationError, ImageGenerationRequest,
    ImageGeneratorPort,
};

/// Fake Image Client 配置
#[derive(Debug, Clone)]
pub struct FakeImageClientConfig {
    /// 第几次轮询时完成
    pub ready_after_polls: u32,
    /// 返回图片的基础 URL
    pub image_base_url: String,
}

impl Default for FakeImageClientConfig {
    fn default() -> Self {
        Self {
            ready_after_polls: 1,
            image_base_url: "https://picsum.photos/seed".to_string(),
        }
    }
}

/// Fake Image Client
pub struct FakeImageClient {
    config: FakeImageClientConfig,
    /// generation_id -> (已轮询次数, 宽, 高)
    jobs: DashMap<String, (u32, u32, u32)>,
}

impl FakeImageClient {
    pub fn new(config: FakeImageClientConfig) -> Self {
        tracing::info!(
            ready_after_polls = config.ready_after_polls,
            "FakeImageClient initialized"
        );
        Self {
            config,
            jobs: DashMap::new(),
        }
    }
}

#[async_trait]
impl ImageGeneratorPort for FakeImageClient {
    async fn submit(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GenerationId, ImageGenerationError> {
        let id = format!("fake-{}", uuid::Uuid::new_v4());
        tracing::debug!(
            generation_id = %id,
            prompt_len = request.prompt.len(),
            "FakeImageClient: job accepted"
        );
        self.jobs
            .insert(id.clone(), (0, request.width, request.height));
        Ok(GenerationId::new(id))
    }

    async fn poll(&self, id: &GenerationId) -> Result<GenerationStatus, ImageGenerationError> {
        let mut job = self.jobs.get_mut(id.as_str()).ok_or_else(|| {
            ImageGenerationError::InvalidResponse(format!("unknown generation {}", id))
        })?;
        job.0 += 1;

        if job.0 < self.config.ready_after_polls {
            return Ok(GenerationStatus::Pending);
        }

        let url = format!(
            "{}/{}/{}/{}",
            self.config.image_base_url, id, job.1, job.2
        );
        drop(job);
        self.jobs.remove(id.as_str());

        Ok(GenerationStatus::Complete(vec![url]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest {
            prompt: "p".to_string(),
            negative_prompt: String::new(),
            model_id: "m".to_string(),
            width: 512,
            height: 256,
            num_images: 1,
            guidance_scale: 7.0,
            alchemy: false,
        }
    }

    #[tokio::test]
    async fn test_ready_after_configured_polls() {
        let client = FakeImageClient::new(FakeImageClientConfig {
            ready_after_polls: 2,
            image_base_url: "https://img.local".to_string(),
        });

        let id = client.submit(request()).await.unwrap();
        assert_eq!(client.poll(&id).await.unwrap(), GenerationStatus::Pending);

        match client.poll(&id).await.unwrap() {
            GenerationStatus::Complete(urls) => {
                assert_eq!(urls, vec![format!("https://img.local/{}/512/256", id)]);
            }
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_an_error() {
        let client = FakeImageClient::new(FakeImageClientConfig::default());
        assert!(client.poll(&GenerationId::new("nope")).await.is_err());
    }
}
