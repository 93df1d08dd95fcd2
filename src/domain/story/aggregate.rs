//! Story Context - Aggregate Root

use serde::Serialize;

use super::FinishedScene;

/// Story 聚合根
///
/// 不变量:
/// - 场景顺序与文本模型返回的顺序一致
/// - 每个 SceneDraft 恰好对应一个 FinishedScene（配图失败用占位图，不丢场景）
/// - 返回给调用方时总是完整的
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Story {
    title: String,
    scenes: Vec<FinishedScene>,
}

impl Story {
    pub fn new(title: impl Into<String>, scenes: Vec<FinishedScene>) -> Self {
        Self {
            title: title.into(),
            scenes,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn scenes(&self) -> &[FinishedScene] {
        &self.scenes
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// 配图未成功（失败或超时）的场景数
    pub fn degraded_scene_count(&self) -> usize {
        self.scenes.iter().filter(|s| !s.image.is_ready()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::{IllustrationOutcome, SceneDraft};

    #[test]
    fn test_story_serialization() {
        let story = Story::new(
            "The Keeper",
            vec![
                FinishedScene::new(
                    SceneDraft::new(1, "first"),
                    "first prompt".to_string(),
                    IllustrationOutcome::Ready("https://img/1".to_string()),
                ),
                FinishedScene::new(
                    SceneDraft::new(2, "second"),
                    "second".to_string(),
                    IllustrationOutcome::Failed,
                ),
            ],
        );

        assert_eq!(story.degraded_scene_count(), 1);

        let json = serde_json::to_value(&story).unwrap();
        assert_eq!(json["title"], "The Keeper");
        assert_eq!(json["scenes"].as_array().unwrap().len(), 2);
        assert_eq!(json["scenes"][0]["imageUrl"], "https://img/1");
    }
}
