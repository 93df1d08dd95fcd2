//! Fake Text Client - 离线开发用的文本生成客户端
//!
//! 不调用外部服务，按请求的模型区分两类指令：
//! - 提示词提炼模型：返回场景文本本身
//! - 其他模型：返回按要求场景数生成的固定故事

use async_trait::async_trait;

use crate::application::ports::{TextGenerationError, TextGenerationRequest, TextGeneratorPort};
use crate::application::NarrativeSettings;

/// 叙事指令中场景数前的固定文本
const SCENE_COUNT_MARKER: &str = "Break it into exactly ";
/// 提炼指令中场景文本前后的固定文本
const SCENE_TEXT_PREFIX: &str = "\n\nScene: ";
const SCENE_TEXT_SUFFIX: &str = "\n\nOutput the visual prompt only.";

/// Fake Text Client 配置
#[derive(Debug, Clone)]
pub struct FakeTextClientConfig {
    /// 模拟的响应延迟（毫秒）
    pub latency_ms: u64,
    /// 提示词提炼请求使用的模型名
    pub prompt_model: String,
}

impl Default for FakeTextClientConfig {
    fn default() -> Self {
        Self {
            latency_ms: 200,
            prompt_model: NarrativeSettings::default().prompt_model,
        }
    }
}

/// Fake Text Client
pub struct FakeTextClient {
    config: FakeTextClientConfig,
}

impl FakeTextClient {
    pub fn new(config: FakeTextClientConfig) -> Self {
        tracing::info!(latency_ms = config.latency_ms, "FakeTextClient initialized");
        Self { config }
    }

    /// 从叙事指令中读取 "exactly N distinct scenes"
    ///
    /// 取最后一次出现的位置，概念文本在它之前
    fn requested_scenes(message: &str) -> usize {
        message
            .rsplit(SCENE_COUNT_MARKER)
            .next()
            .filter(|_| message.contains(SCENE_COUNT_MARKER))
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|n| n.parse().ok())
            .unwrap_or(3)
    }

    /// 提炼指令中的场景文本；模板不符时原样返回
    fn scene_text(message: &str) -> &str {
        message
            .split_once(SCENE_TEXT_PREFIX)
            .map(|(_, rest)| rest.strip_suffix(SCENE_TEXT_SUFFIX).unwrap_or(rest))
            .unwrap_or(message)
    }

    fn fake_narrative(message: &str) -> String {
        let count = Self::requested_scenes(message);
        let scenes: Vec<serde_json::Value> = (1..=count)
            .map(|n| {
                serde_json::json!({
                    "sceneNumber": n,
                    "description": format!(
                        "Scene {}: a small figure in a red coat stands on a grey shore under a wide sky.",
                        n
                    ),
                })
            })
            .collect();

        format!(
            "Here is your story:\n{}",
            serde_json::json!({ "title": "The Offline Tale", "scenes": scenes })
        )
    }
}

#[async_trait]
impl TextGeneratorPort for FakeTextClient {
    async fn chat(&self, request: TextGenerationRequest) -> Result<String, TextGenerationError> {
        tracing::debug!(
            model = %request.model,
            message_len = request.message.len(),
            "FakeTextClient: returning canned text"
        );

        tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;

        if request.model == self.config.prompt_model {
            return Ok(Self::scene_text(&request.message).trim().to_string());
        }

        Ok(Self::fake_narrative(&request.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::StoryBrief;
    use crate::domain::{narrative_instruction, parse_narrative, visual_prompt_instruction};

    fn client() -> FakeTextClient {
        FakeTextClient::new(FakeTextClientConfig {
            latency_ms: 0,
            ..FakeTextClientConfig::default()
        })
    }

    #[tokio::test]
    async fn test_fake_narrative_matches_requested_count() {
        let brief = StoryBrief::new("a quiet harbor", "Adventure", "Serious", 5, 10).unwrap();
        let raw = client()
            .chat(TextGenerationRequest {
                model: "command-a-03-2025".to_string(),
                message: narrative_instruction(&brief),
                temperature: 0.7,
            })
            .await
            .unwrap();

        let narrative = parse_narrative(&raw).unwrap();
        assert_eq!(narrative.scenes.len(), 5);
    }

    #[tokio::test]
    async fn test_fake_visual_prompt_echoes_scene() {
        let text = client()
            .chat(TextGenerationRequest {
                model: "command".to_string(),
                message: visual_prompt_instruction("A boat leaves the dock."),
                temperature: 0.3,
            })
            .await
            .unwrap();

        assert_eq!(text, "A boat leaves the dock.");
    }

    #[tokio::test]
    async fn test_concept_text_does_not_confuse_request_kind() {
        let brief = StoryBrief::new(
            "Scene: exactly 9 ghosts haunt a theatre",
            "Horror",
            "Dark",
            2,
            10,
        )
        .unwrap();
        let raw = client()
            .chat(TextGenerationRequest {
                model: "command-a-03-2025".to_string(),
                message: narrative_instruction(&brief),
                temperature: 0.7,
            })
            .await
            .unwrap();

        let narrative = parse_narrative(&raw).unwrap();
        assert_eq!(narrative.scenes.len(), 2);

        let text = client()
            .chat(TextGenerationRequest {
                model: "command".to_string(),
                message: visual_prompt_instruction("Scene: the curtain rises.\n\nA ghost bows."),
                temperature: 0.3,
            })
            .await
            .unwrap();
        assert_eq!(text, "Scene: the curtain rises.\n\nA ghost bows.");
    }
}
