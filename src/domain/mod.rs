//! Domain Layer - 领域层
//!
//! - Story Context: 简报、场景、故事
//! - 配图风格表与提示词拼装
//! - 文本模型指令与叙事响应解析

pub mod story;

mod narrative_parser;
mod prompts;
mod style;

pub use narrative_parser::{extract_json_object, parse_narrative, NarrativeParseError};
pub use prompts::{narrative_instruction, visual_prompt_instruction};
pub use style::{
    compose_image_prompt, genre_style, style_descriptor, tone_style, DEFAULT_GENRE_STYLE,
    DEFAULT_TONE_STYLE, NEGATIVE_PROMPT,
};
