//! 测试替身：可编排的文本/图像生成服务

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::application::ports::{
    GenerationId, GenerationStatus, ImageGenerationError, ImageGenerationRequest,
    ImageGeneratorPort, TextGenerationError, TextGenerationRequest, TextGeneratorPort,
};
use crate::application::services::NarrativeSettings;

/// 文本替身
///
/// story-model 返回预置的叙事响应；prompt-model 返回 "visual: {场景文本}"
pub struct ScriptedTextGenerator {
    narrative: Option<String>,
    failing_prompts: Vec<String>,
    requests: Mutex<Vec<TextGenerationRequest>>,
}

impl ScriptedTextGenerator {
    pub fn settings() -> NarrativeSettings {
        NarrativeSettings {
            story_model: "story-model".to_string(),
            story_temperature: 0.7,
            prompt_model: "prompt-model".to_string(),
            prompt_temperature: 0.3,
        }
    }

    pub fn with_raw_narrative(raw: &str) -> Self {
        Self {
            narrative: Some(raw.to_string()),
            failing_prompts: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_scenes(descriptions: &[&str]) -> Self {
        let scenes: Vec<serde_json::Value> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| serde_json::json!({ "sceneNumber": i + 1, "description": d }))
            .collect();
        let payload = serde_json::json!({ "title": "Scripted Story", "scenes": scenes });
        Self::with_raw_narrative(&payload.to_string())
    }

    pub fn failing_narrative() -> Self {
        Self {
            narrative: None,
            failing_prompts: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_prompt_for(mut self, scene_text: &str) -> Self {
        self.failing_prompts.push(scene_text.to_string());
        self
    }

    pub fn requests(&self) -> Vec<TextGenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGeneratorPort for ScriptedTextGenerator {
    async fn chat(&self, request: TextGenerationRequest) -> Result<String, TextGenerationError> {
        self.requests.lock().unwrap().push(request.clone());

        if request.model == "story-model" {
            return self
                .narrative
                .clone()
                .ok_or_else(|| TextGenerationError::NetworkError("connection refused".to_string()));
        }

        let scene = request
            .message
            .split("Scene: ")
            .nth(1)
            .and_then(|rest| rest.split("\n\nOutput").next())
            .unwrap_or_default()
            .to_string();

        if self.failing_prompts.contains(&scene) {
            return Err(TextGenerationError::ServiceError("HTTP 500".to_string()));
        }

        Ok(format!("  visual: {}  \n", scene))
    }
}

/// 图像替身的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBehavior {
    /// 第 n 次轮询时完成
    ReadyAfter(u32),
    NeverReady,
    SubmitFails,
    ProviderFails,
    PollErrors,
}

struct ScriptedJob {
    behavior: ImageBehavior,
    polls: u32,
    url: String,
}

#[derive(Default)]
struct ImageState {
    submitted: Vec<ImageGenerationRequest>,
    jobs: HashMap<String, ScriptedJob>,
}

/// 图像替身
///
/// 按提示词中包含的关键字选择行为，未匹配时第一次轮询即完成
pub struct ScriptedImageGenerator {
    scripts: Vec<(String, ImageBehavior)>,
    state: Mutex<ImageState>,
    polls: AtomicU32,
}

impl ScriptedImageGenerator {
    pub fn new() -> Self {
        Self {
            scripts: Vec::new(),
            state: Mutex::new(ImageState::default()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn script(mut self, keyword: &str, behavior: ImageBehavior) -> Self {
        self.scripts.push((keyword.to_string(), behavior));
        self
    }

    pub fn submitted(&self) -> Vec<ImageGenerationRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    fn behavior_for(&self, prompt: &str) -> (String, ImageBehavior) {
        self.scripts
            .iter()
            .find(|(keyword, _)| prompt.contains(keyword.as_str()))
            .map(|(keyword, behavior)| (keyword.clone(), *behavior))
            .unwrap_or_else(|| ("image".to_string(), ImageBehavior::ReadyAfter(1)))
    }
}

#[async_trait]
impl ImageGeneratorPort for ScriptedImageGenerator {
    async fn submit(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GenerationId, ImageGenerationError> {
        let (keyword, behavior) = self.behavior_for(&request.prompt);
        let mut state = self.state.lock().unwrap();
        let index = state.submitted.len();
        state.submitted.push(request);

        if behavior == ImageBehavior::SubmitFails {
            return Err(ImageGenerationError::Unauthorized);
        }

        let id = format!("gen-{}", index);
        state.jobs.insert(
            id.clone(),
            ScriptedJob {
                behavior,
                polls: 0,
                url: format!("https://img.test/{}-{}.png", keyword, index),
            },
        );
        Ok(GenerationId::new(id))
    }

    async fn poll(&self, id: &GenerationId) -> Result<GenerationStatus, ImageGenerationError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let job = state
            .jobs
            .get_mut(id.as_str())
            .ok_or_else(|| ImageGenerationError::InvalidResponse(format!("unknown id {}", id)))?;
        job.polls += 1;

        match job.behavior {
            ImageBehavior::ReadyAfter(n) if job.polls >= n => {
                Ok(GenerationStatus::Complete(vec![job.url.clone()]))
            }
            ImageBehavior::ReadyAfter(_) | ImageBehavior::NeverReady => {
                Ok(GenerationStatus::Pending)
            }
            ImageBehavior::ProviderFails => {
                Ok(GenerationStatus::Failed("content policy".to_string()))
            }
            ImageBehavior::PollErrors => {
                Err(ImageGenerationError::NetworkError("reset by peer".to_string()))
            }
            ImageBehavior::SubmitFails => unreachable!("submission never succeeds"),
        }
    }
}
