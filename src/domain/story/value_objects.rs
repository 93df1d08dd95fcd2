//! Story Context - Value Objects

use serde::{Deserialize, Serialize};

use super::StoryError;

/// 默认允许的最大场景数
pub const DEFAULT_MAX_SCENES: u32 = 10;

/// 场景数量（1..=max）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCount(u32);

impl SceneCount {
    pub fn new(count: u32, max: u32) -> Result<Self, StoryError> {
        if count == 0 || count > max {
            return Err(StoryError::SceneCountOutOfRange {
                requested: count,
                max,
            });
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SceneCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 创作简报
///
/// 每个请求构造一次，之后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBrief {
    concept: String,
    genre: String,
    tone: String,
    scene_count: SceneCount,
    target_audience: Option<String>,
}

impl StoryBrief {
    /// 创建简报并校验
    ///
    /// - concept 去除首尾空白后不能为空
    /// - genre / tone 允许为空（配图风格回退到默认值）
    pub fn new(
        concept: impl Into<String>,
        genre: impl Into<String>,
        tone: impl Into<String>,
        scene_count: u32,
        max_scenes: u32,
    ) -> Result<Self, StoryError> {
        let concept = concept.into().trim().to_string();
        if concept.is_empty() {
            return Err(StoryError::EmptyConcept);
        }

        Ok(Self {
            concept,
            genre: genre.into().trim().to_string(),
            tone: tone.into().trim().to_string(),
            scene_count: SceneCount::new(scene_count, max_scenes)?,
            target_audience: None,
        })
    }

    /// 设置目标读者（仅作为叙事请求的参考）
    pub fn with_target_audience(mut self, audience: Option<String>) -> Self {
        self.target_audience = audience
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        self
    }

    pub fn concept(&self) -> &str {
        &self.concept
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn scene_count(&self) -> SceneCount {
        self.scene_count
    }

    pub fn target_audience(&self) -> Option<&str> {
        self.target_audience.as_deref()
    }
}
