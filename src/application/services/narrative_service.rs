//! Narrative Service - 叙事生成与视觉提示词提炼
//!
//! 基于 TextGeneratorPort：
//! - generate_narrative: 生成标题与按顺序排列的场景，失败对整个请求致命
//! - derive_visual_prompt: 把场景散文提炼为字面的图像提示词，失败时回退为原文

use std::sync::Arc;

use crate::application::error::NarrativeGenerationError;
use crate::application::ports::{TextGenerationRequest, TextGeneratorPort};
use crate::domain::story::{NarrativeResult, StoryBrief};
use crate::domain::{narrative_instruction, parse_narrative, visual_prompt_instruction};

/// 文本模型参数
#[derive(Debug, Clone)]
pub struct NarrativeSettings {
    /// 叙事生成使用的模型
    pub story_model: String,
    pub story_temperature: f32,
    /// 提示词提炼使用的模型
    pub prompt_model: String,
    /// 低温度，偏向字面、确定的输出
    pub prompt_temperature: f32,
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            story_model: "command-a-03-2025".to_string(),
            story_temperature: 0.7,
            prompt_model: "command".to_string(),
            prompt_temperature: 0.3,
        }
    }
}

/// 叙事服务
pub struct NarrativeService {
    text_generator: Arc<dyn TextGeneratorPort>,
    settings: NarrativeSettings,
}

impl NarrativeService {
    pub fn new(text_generator: Arc<dyn TextGeneratorPort>, settings: NarrativeSettings) -> Self {
        Self {
            text_generator,
            settings,
        }
    }

    /// 生成故事骨架
    ///
    /// 不做自动重试；场景数与请求不一致只记录警告
    pub async fn generate_narrative(
        &self,
        brief: &StoryBrief,
    ) -> Result<NarrativeResult, NarrativeGenerationError> {
        let request = TextGenerationRequest {
            model: self.settings.story_model.clone(),
            message: narrative_instruction(brief),
            temperature: self.settings.story_temperature,
        };

        tracing::debug!(
            model = %request.model,
            scene_count = brief.scene_count().get(),
            "Requesting narrative"
        );

        let raw = self.text_generator.chat(request).await.map_err(|e| {
            tracing::error!(error = %e, "Narrative provider call failed");
            NarrativeGenerationError::from(e)
        })?;

        let narrative = parse_narrative(&raw).map_err(|e| {
            tracing::error!(error = %e, response_len = raw.len(), "Narrative response unusable");
            NarrativeGenerationError::from(e)
        })?;

        let requested = brief.scene_count().get() as usize;
        if narrative.scenes.len() != requested {
            tracing::warn!(
                requested,
                received = narrative.scenes.len(),
                "Narrative scene count differs from request"
            );
        }

        tracing::info!(
            title = %narrative.title,
            scenes = narrative.scenes.len(),
            "Narrative generated"
        );

        Ok(narrative)
    }

    /// 提炼视觉提示词
    ///
    /// 任何失败（包括空响应）都返回原始场景文本，不向上传播
    pub async fn derive_visual_prompt(&self, scene_text: &str) -> String {
        let request = TextGenerationRequest {
            model: self.settings.prompt_model.clone(),
            message: visual_prompt_instruction(scene_text),
            temperature: self.settings.prompt_temperature,
        };

        match self.text_generator.chat(request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Visual prompt derivation returned empty text, using scene text");
                scene_text.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Visual prompt derivation failed, using scene text");
                scene_text.to_string()
            }
        }
    }
}
