//! Story Context
//!
//! 故事生成的核心领域模型：
//! - StoryBrief: 用户的创作简报（输入）
//! - SceneDraft / NarrativeResult: 文本模型产出的故事骨架
//! - FinishedScene / Story: 配图完成后的最终故事（输出）

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Story;
pub use entities::{
    FinishedScene, IllustrationOutcome, NarrativeResult, SceneDraft, FAILED_PLACEHOLDER_URL,
    TIMED_OUT_PLACEHOLDER_URL,
};
pub use errors::StoryError;
pub use value_objects::{SceneCount, StoryBrief, DEFAULT_MAX_SCENES};
