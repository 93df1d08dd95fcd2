//! Illustration Service - 场景配图
//!
//! 流程：风格查表 → 拼装提示词 → 提交生成任务 → 按固定间隔轮询
//!
//! 任何失败都在这里被吸收为占位结果，编排器可以无条件继续处理下一个场景

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    GenerationId, GenerationStatus, ImageGenerationRequest, ImageGeneratorPort,
};
use crate::domain::story::IllustrationOutcome;
use crate::domain::{compose_image_prompt, NEGATIVE_PROMPT};

/// 默认轮询间隔
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// 默认最大轮询次数（约 45 秒）
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 15;

/// 图像生成参数
#[derive(Debug, Clone)]
pub struct IllustrationSettings {
    pub model_id: String,
    pub width: u32,
    pub height: u32,
    pub num_images: u32,
    pub guidance_scale: f32,
    pub alchemy: bool,
    /// 每次轮询前等待的时间
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for IllustrationSettings {
    fn default() -> Self {
        Self {
            model_id: "7b592283-e8a7-4c5a-9ba6-d18c31f258b9".to_string(),
            width: 768,
            height: 768,
            num_images: 1,
            guidance_scale: 9.0,
            alchemy: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// 配图服务
pub struct IllustrationService {
    image_generator: Arc<dyn ImageGeneratorPort>,
    settings: IllustrationSettings,
}

impl IllustrationService {
    pub fn new(image_generator: Arc<dyn ImageGeneratorPort>, settings: IllustrationSettings) -> Self {
        Self {
            image_generator,
            settings,
        }
    }

    /// 为一个场景生成配图
    ///
    /// 返回真实 URL，或 Failed / TimedOut 占位结果；从不返回错误
    pub async fn generate_illustration(
        &self,
        visual_prompt: &str,
        genre: &str,
        tone: &str,
    ) -> IllustrationOutcome {
        let request = ImageGenerationRequest {
            prompt: compose_image_prompt(visual_prompt, genre, tone),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
            model_id: self.settings.model_id.clone(),
            width: self.settings.width,
            height: self.settings.height,
            num_images: self.settings.num_images,
            guidance_scale: self.settings.guidance_scale,
            alchemy: self.settings.alchemy,
        };

        let generation_id = match self.image_generator.submit(request).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Illustration submission failed");
                return IllustrationOutcome::Failed;
            }
        };

        tracing::debug!(generation_id = %generation_id, "Illustration job submitted");

        self.wait_for_image(&generation_id).await
    }

    /// 轮询直到拿到第一张图片或用尽次数
    async fn wait_for_image(&self, generation_id: &GenerationId) -> IllustrationOutcome {
        for attempt in 1..=self.settings.max_poll_attempts {
            tokio::time::sleep(self.settings.poll_interval).await;

            match self.image_generator.poll(generation_id).await {
                Ok(GenerationStatus::Complete(urls)) => {
                    if let Some(url) = urls.into_iter().next() {
                        tracing::info!(
                            generation_id = %generation_id,
                            attempt,
                            "Illustration ready"
                        );
                        return IllustrationOutcome::Ready(url);
                    }
                }
                Ok(GenerationStatus::Pending) => {}
                Ok(GenerationStatus::Failed(reason)) => {
                    tracing::warn!(
                        generation_id = %generation_id,
                        reason = %reason,
                        "Illustration provider reported failure"
                    );
                    return IllustrationOutcome::Failed;
                }
                Err(e) => {
                    tracing::warn!(
                        generation_id = %generation_id,
                        attempt,
                        error = %e,
                        "Illustration poll failed"
                    );
                    return IllustrationOutcome::Failed;
                }
            }
        }

        tracing::warn!(
            generation_id = %generation_id,
            attempts = self.settings.max_poll_attempts,
            "Illustration timed out"
        );
        IllustrationOutcome::TimedOut
    }
}
