//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::GenerateStoryCommand;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Story DTOs
// ============================================================================

/// 创作简报请求
///
/// 兼容旧前端的 `scenes` 字段名
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryBriefRequest {
    pub concept: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub tone: String,
    #[serde(alias = "scenes", default = "default_scene_count")]
    pub scene_count: u32,
    #[serde(default)]
    pub target_audience: Option<String>,
}

fn default_scene_count() -> u32 {
    3
}

impl From<StoryBriefRequest> for GenerateStoryCommand {
    fn from(req: StoryBriefRequest) -> Self {
        Self {
            concept: req.concept,
            genre: req.genre,
            tone: req.tone,
            scene_count: req.scene_count,
            target_audience: req.target_audience,
        }
    }
}
