//! 文本模型指令
//!
//! 叙事生成与视觉提示词提炼两类指令的构造

use crate::domain::story::StoryBrief;

/// 叙事生成指令
///
/// 要求模型给出标题和恰好 N 个场景，每个场景只描述镜头能看到的内容，
/// 并且只输出一个 JSON 对象
pub fn narrative_instruction(brief: &StoryBrief) -> String {
    let audience = brief
        .target_audience()
        .map(|a| format!("The intended audience is: {}.\n", a))
        .unwrap_or_default();

    format!(
        r#"Write a {genre} story with a {tone} tone about: "{concept}".
{audience}Break it into exactly {count} distinct scenes.

IMPORTANT: Each scene description must be highly visual and descriptive of the setting and characters.
Avoid internal dialogue; focus on what a camera would see.

Return ONLY valid JSON:
{{
  "title": "Story Title",
  "scenes": [
    {{ "sceneNumber": 1, "description": "Visual description of the scene..." }}
  ]
}}"#,
        genre = brief.genre(),
        tone = brief.tone(),
        concept = brief.concept(),
        audience = audience,
        count = brief.scene_count(),
    )
}

/// 视觉提示词提炼指令
pub fn visual_prompt_instruction(scene_text: &str) -> String {
    format!(
        "Task: Convert this story scene into a precise image generation prompt.
Focus on: Subject, Clothing, Action, and Background.
Rule: Use concrete nouns and verbs. No metaphors.

Scene: {}

Output the visual prompt only.",
        scene_text
    )
}
