//! Story Command Handlers - 故事编排
//!
//! GenerateStoryHandler 串起两个生成式服务：
//! 1. 生成叙事（失败则整个请求失败，没有部分结果）
//! 2. 按叙事顺序逐个场景：提炼视觉提示词 → 生成配图 → 组装 FinishedScene
//! 3. 返回完整的 Story
//!
//! 场景默认严格串行处理，图像服务对同一调用方的并发任务比较敏感。
//! scene_concurrency > 1 时使用有序缓冲流，完成顺序不影响输出顺序

use futures_util::{stream, StreamExt};
use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::GenerateStoryCommand;
use crate::application::error::ApplicationError;
use crate::application::ports::{NoProgress, StoryProgress};
use crate::application::services::{IllustrationService, NarrativeService};
use crate::domain::story::{FinishedScene, SceneDraft, Story, StoryBrief, DEFAULT_MAX_SCENES};

/// 编排参数
#[derive(Debug, Clone)]
pub struct StorySettings {
    /// 单个故事允许的最大场景数
    pub max_scenes: u32,
    /// 同时处理的场景数，1 表示严格串行
    pub scene_concurrency: usize,
    /// 整体请求时限，None 表示不限制
    pub request_deadline: Option<Duration>,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            max_scenes: DEFAULT_MAX_SCENES,
            scene_concurrency: 1,
            request_deadline: None,
        }
    }
}

/// GenerateStory Handler - 故事编排器
pub struct GenerateStoryHandler {
    narrative: Arc<NarrativeService>,
    illustration: Arc<IllustrationService>,
    settings: StorySettings,
}

impl GenerateStoryHandler {
    pub fn new(
        narrative: Arc<NarrativeService>,
        illustration: Arc<IllustrationService>,
        settings: StorySettings,
    ) -> Self {
        Self {
            narrative,
            illustration,
            settings,
        }
    }

    pub fn settings(&self) -> &StorySettings {
        &self.settings
    }

    pub async fn handle(&self, cmd: GenerateStoryCommand) -> Result<Story, ApplicationError> {
        let brief = cmd.into_brief(self.settings.max_scenes)?;
        self.generate(&brief, &NoProgress).await
    }

    /// 为已校验的简报生成故事，并在各阶段回调进度
    pub async fn generate(
        &self,
        brief: &StoryBrief,
        progress: &dyn StoryProgress,
    ) -> Result<Story, ApplicationError> {
        let started = tokio::time::Instant::now();

        let story = match self.settings.request_deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(brief, progress))
                .await
                .map_err(|_| {
                    tracing::error!(
                        deadline_secs = deadline.as_secs(),
                        "Story generation exceeded deadline"
                    );
                    ApplicationError::DeadlineExceeded(deadline.as_secs())
                })??,
            None => self.run(brief, progress).await?,
        };

        tracing::info!(
            title = %story.title(),
            scenes = story.scene_count(),
            degraded = story.degraded_scene_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Story generated"
        );

        Ok(story)
    }

    async fn run(
        &self,
        brief: &StoryBrief,
        progress: &dyn StoryProgress,
    ) -> Result<Story, ApplicationError> {
        progress.narrative_started();
        let narrative = self.narrative.generate_narrative(brief).await?;

        let total = narrative.scenes.len();
        progress.narrative_ready(&narrative.title, total);

        let scenes = if self.settings.scene_concurrency <= 1 {
            let mut finished = Vec::with_capacity(total);
            for draft in narrative.scenes {
                finished.push(self.process_scene(draft, brief, total, progress).await);
            }
            finished
        } else {
            // buffered 按输入顺序产出结果
            stream::iter(narrative.scenes)
                .map(|draft| self.process_scene(draft, brief, total, progress))
                .buffered(self.settings.scene_concurrency)
                .collect::<Vec<_>>()
                .await
        };

        Ok(Story::new(narrative.title, scenes))
    }

    async fn process_scene(
        &self,
        draft: SceneDraft,
        brief: &StoryBrief,
        total: usize,
        progress: &dyn StoryProgress,
    ) -> FinishedScene {
        progress.scene_started(draft.scene_number, total);
        tracing::debug!(scene = draft.scene_number, total, "Processing scene");

        let visual_prompt = self.narrative.derive_visual_prompt(&draft.description).await;
        let image = self
            .illustration
            .generate_illustration(&visual_prompt, brief.genre(), brief.tone())
            .await;

        let scene = FinishedScene::new(draft, visual_prompt, image);
        progress.scene_finished(&scene);
        scene
    }
}
