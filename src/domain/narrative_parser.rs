//! 叙事响应解析
//!
//! 模型经常在 JSON 前后夹带说明文字。这里截取第一个 `{` 到最后一个 `}`
//! 之间的内容再解析；找不到或解析失败时返回明确的错误

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::story::{NarrativeResult, SceneDraft};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NarrativeParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("malformed narrative JSON: {0}")]
    Malformed(String),

    #[error("narrative contains no scenes")]
    NoScenes,
}

/// 截取响应中第一个 `{` 到最后一个 `}`（含）之间的文本
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// 模型输出的原始结构
///
/// `sceneNumber` 最终按位置重写，因此接受任意 JSON 值（字符串、null、浮点数）
#[derive(Debug, Deserialize)]
struct RawNarrative {
    title: String,
    scenes: Vec<RawScene>,
}

#[derive(Debug, Deserialize)]
struct RawScene {
    #[serde(default, rename = "sceneNumber")]
    scene_number: Option<Value>,
    description: String,
}

/// 解析叙事响应
///
/// 场景序号按位置重新编号为 1..=N，保证输出顺序与编号一致
pub fn parse_narrative(raw: &str) -> Result<NarrativeResult, NarrativeParseError> {
    let json = extract_json_object(raw).ok_or(NarrativeParseError::NoJsonObject)?;

    let narrative: RawNarrative = serde_json::from_str(json)
        .map_err(|e| NarrativeParseError::Malformed(e.to_string()))?;

    if narrative.scenes.is_empty() {
        return Err(NarrativeParseError::NoScenes);
    }

    let scenes = narrative
        .scenes
        .into_iter()
        .enumerate()
        .map(|(index, scene)| {
            let position = index as u32 + 1;
            let reported = scene.scene_number.as_ref().and_then(Value::as_u64);
            if reported != Some(u64::from(position)) {
                tracing::debug!(
                    reported = ?scene.scene_number,
                    position,
                    "Renumbering scene to match its position"
                );
            }
            SceneDraft::new(position, scene.description)
        })
        .collect();

    Ok(NarrativeResult {
        title: narrative.title,
        scenes,
    })
}
