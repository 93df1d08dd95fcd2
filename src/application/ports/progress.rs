//! Story Progress Port - 生成进度回调

use crate::domain::story::FinishedScene;

/// 生成进度观察者
///
/// 编排器在各阶段调用；默认实现全部为空
pub trait StoryProgress: Send + Sync {
    fn narrative_started(&self) {}

    fn narrative_ready(&self, _title: &str, _scene_count: usize) {}

    fn scene_started(&self, _scene_number: u32, _total: usize) {}

    fn scene_finished(&self, _scene: &FinishedScene) {}
}

/// 不关心进度时使用
pub struct NoProgress;

impl StoryProgress for NoProgress {}
