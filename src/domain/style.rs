//! 配图风格
//!
//! 根据题材（genre）与基调（tone）查表得到风格描述，并拼装最终的图像提示词

/// 未知题材时的默认风格
pub const DEFAULT_GENRE_STYLE: &str = "digital art";

/// 未知基调时的默认光影
pub const DEFAULT_TONE_STYLE: &str = "balanced lighting";

/// 固定的反向提示词，抑制文字、水印、畸形肢体和模糊
pub const NEGATIVE_PROMPT: &str =
    "text, letters, watermark, distorted face, extra limbs, blurry, low quality";

/// 通用质量标签，权重最低，放在提示词末尾
const QUALITY_TAGS: &str = "8k resolution, highly detailed, masterpiece.";

const GENRE_STYLES: &[(&str, &str)] = &[
    ("Fantasy", "ethereal fantasy art, intricate detail, magical glow"),
    ("Sci-fi", "cyberpunk aesthetic, futuristic tech, neon lighting"),
    ("Mystery", "film noir, heavy shadows, misty atmosphere"),
    ("Educational", "flat vector illustration, clean lines, bright colors"),
    ("Romance", "soft focus, warm cinematic lighting, pastel hues"),
    ("Horror", "ghastly lighting, high contrast, dark eerie atmosphere"),
    ("Adventure", "epic cinematic wide shot, vibrant colors"),
];

const TONE_STYLES: &[(&str, &str)] = &[
    ("Humorous", "vibrant cartoon style, expressive characters"),
    ("Serious", "photorealistic, cinematic, muted colors"),
    ("Dark", "low key lighting, moody, dramatic shadows"),
    ("Whimsical", "storybook style, dreamy, surreal elements"),
    ("Inspirational", "golden hour lighting, lens flare, uplifting"),
];

#[inline]
fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    let key = key.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, style)| *style)
}

/// 题材对应的画风
pub fn genre_style(genre: &str) -> &'static str {
    lookup(GENRE_STYLES, genre).unwrap_or(DEFAULT_GENRE_STYLE)
}

/// 基调对应的光影氛围
pub fn tone_style(tone: &str) -> &'static str {
    lookup(TONE_STYLES, tone).unwrap_or(DEFAULT_TONE_STYLE)
}

/// 完整风格描述: "{genre style}, {tone style}"
pub fn style_descriptor(genre: &str, tone: &str) -> String {
    format!("{}, {}", genre_style(genre), tone_style(tone))
}

/// 拼装最终提示词
///
/// 顺序即权重：主体 > 环境/风格 > 通用质量标签
pub fn compose_image_prompt(visual_prompt: &str, genre: &str, tone: &str) -> String {
    format!(
        "(Subject: {}), (Style: {}), {}",
        visual_prompt.trim(),
        style_descriptor(genre, tone),
        QUALITY_TAGS
    )
}
