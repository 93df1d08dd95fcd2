//! Story Context - Entities

use serde::{Deserialize, Serialize, Serializer};

/// 配图生成失败时的占位图
pub const FAILED_PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/1024x1024?text=Image+Generation+Failed";

/// 配图轮询超时时的占位图
pub const TIMED_OUT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/1024x1024?text=Timed+Out";

/// 文本模型产出的单个场景
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDraft {
    /// 1-based 序号；模型可能缺省或给错，解析后会按位置归一化
    #[serde(default)]
    pub scene_number: u32,
    pub description: String,
}

impl SceneDraft {
    pub fn new(scene_number: u32, description: impl Into<String>) -> Self {
        Self {
            scene_number,
            description: description.into(),
        }
    }
}

/// 文本模型产出的故事骨架
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub title: String,
    pub scenes: Vec<SceneDraft>,
}

/// 单个场景的配图结果
///
/// 对外序列化时始终是一个 URL 字符串，失败和超时使用占位图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IllustrationOutcome {
    Ready(String),
    Failed,
    TimedOut,
}

impl IllustrationOutcome {
    pub fn url(&self) -> &str {
        match self {
            IllustrationOutcome::Ready(url) => url,
            IllustrationOutcome::Failed => FAILED_PLACEHOLDER_URL,
            IllustrationOutcome::TimedOut => TIMED_OUT_PLACEHOLDER_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IllustrationOutcome::Ready(_) => "ready",
            IllustrationOutcome::Failed => "failed",
            IllustrationOutcome::TimedOut => "timed_out",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, IllustrationOutcome::Ready(_))
    }
}

impl Serialize for IllustrationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.url())
    }
}

/// 配图完成的场景
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedScene {
    pub scene_number: u32,
    pub description: String,
    pub visual_prompt: String,
    pub image: IllustrationOutcome,
}

impl FinishedScene {
    pub fn new(draft: SceneDraft, visual_prompt: String, image: IllustrationOutcome) -> Self {
        Self {
            scene_number: draft.scene_number,
            description: draft.description,
            visual_prompt,
            image,
        }
    }

    pub fn image_url(&self) -> &str {
        self.image.url()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinishedSceneWire<'a> {
    scene_number: u32,
    description: &'a str,
    visual_prompt: &'a str,
    image_url: &'a IllustrationOutcome,
    image_status: &'static str,
}

impl Serialize for FinishedScene {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FinishedSceneWire {
            scene_number: self.scene_number,
            description: &self.description,
            visual_prompt: &self.visual_prompt,
            image_url: &self.image,
            image_status: self.image.as_str(),
        }
        .serialize(serializer)
    }
}
