//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::{IllustrationSettings, NarrativeSettings, StorySettings};
use crate::domain::story::DEFAULT_MAX_SCENES;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 文本生成（叙事 + 提示词提炼）配置
    #[serde(default)]
    pub narrative: NarrativeConfig,

    /// 图像生成配置
    #[serde(default)]
    pub illustration: IllustrationConfig,

    /// 故事编排配置
    #[serde(default)]
    pub story: StoryConfig,

    /// 异步任务配置
    #[serde(default)]
    pub jobs: JobsConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 生成服务提供方
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 真实的远程服务
    #[default]
    #[serde(alias = "cohere", alias = "leonardo")]
    Remote,
    /// 本地假实现，不访问网络
    Fake,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Remote => "remote",
            ProviderKind::Fake => "fake",
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 文本生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Cohere API 基础 URL
    #[serde(default = "default_narrative_url")]
    pub base_url: String,

    /// API Key，未配置时读取 COHERE_API_KEY
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_story_model")]
    pub story_model: String,

    #[serde(default = "default_story_temperature")]
    pub story_temperature: f32,

    #[serde(default = "default_prompt_model")]
    pub prompt_model: String,

    #[serde(default = "default_prompt_temperature")]
    pub prompt_temperature: f32,

    /// 单次请求超时（秒）
    #[serde(default = "default_narrative_timeout")]
    pub timeout_secs: u64,
}

fn default_narrative_url() -> String {
    "https://api.cohere.com".to_string()
}

fn default_story_model() -> String {
    NarrativeSettings::default().story_model
}

fn default_story_temperature() -> f32 {
    NarrativeSettings::default().story_temperature
}

fn default_prompt_model() -> String {
    NarrativeSettings::default().prompt_model
}

fn default_prompt_temperature() -> f32 {
    NarrativeSettings::default().prompt_temperature
}

fn default_narrative_timeout() -> u64 {
    120
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_narrative_url(),
            api_key: String::new(),
            story_model: default_story_model(),
            story_temperature: default_story_temperature(),
            prompt_model: default_prompt_model(),
            prompt_temperature: default_prompt_temperature(),
            timeout_secs: default_narrative_timeout(),
        }
    }
}

impl NarrativeConfig {
    pub fn settings(&self) -> NarrativeSettings {
        NarrativeSettings {
            story_model: self.story_model.clone(),
            story_temperature: self.story_temperature,
            prompt_model: self.prompt_model.clone(),
            prompt_temperature: self.prompt_temperature,
        }
    }
}

/// 图像生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct IllustrationConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Leonardo API 基础 URL
    #[serde(default = "default_illustration_url")]
    pub base_url: String,

    /// API Key，未配置时读取 LEONARDO_API_KEY
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_image_size")]
    pub width: u32,

    #[serde(default = "default_image_size")]
    pub height: u32,

    #[serde(default = "default_num_images")]
    pub num_images: u32,

    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f32,

    #[serde(default)]
    pub alchemy: bool,

    /// 轮询间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// 最大轮询次数
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// 单次请求超时（秒）
    #[serde(default = "default_illustration_timeout")]
    pub timeout_secs: u64,
}

fn default_illustration_url() -> String {
    "https://cloud.leonardo.ai/api/rest/v1".to_string()
}

fn default_model_id() -> String {
    IllustrationSettings::default().model_id
}

fn default_image_size() -> u32 {
    768
}

fn default_num_images() -> u32 {
    1
}

fn default_guidance_scale() -> f32 {
    9.0
}

fn default_poll_interval() -> u64 {
    3
}

fn default_max_poll_attempts() -> u32 {
    15
}

fn default_illustration_timeout() -> u64 {
    30
}

impl Default for IllustrationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_illustration_url(),
            api_key: String::new(),
            model_id: default_model_id(),
            width: default_image_size(),
            height: default_image_size(),
            num_images: default_num_images(),
            guidance_scale: default_guidance_scale(),
            alchemy: false,
            poll_interval_secs: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            timeout_secs: default_illustration_timeout(),
        }
    }
}

impl IllustrationConfig {
    pub fn settings(&self) -> IllustrationSettings {
        IllustrationSettings {
            model_id: self.model_id.clone(),
            width: self.width,
            height: self.height,
            num_images: self.num_images,
            guidance_scale: self.guidance_scale,
            alchemy: self.alchemy,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_poll_attempts: self.max_poll_attempts,
        }
    }
}

/// 故事编排配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoryConfig {
    /// 单个故事的最大场景数
    #[serde(default = "default_max_scenes")]
    pub max_scenes: u32,

    /// 同时处理的场景数，1 为串行
    #[serde(default = "default_scene_concurrency")]
    pub scene_concurrency: usize,

    /// 单个故事的整体生成时限（秒），同步请求和后台任务都受其约束；不配置则不限制
    #[serde(default)]
    pub request_deadline_secs: Option<u64>,
}

fn default_max_scenes() -> u32 {
    DEFAULT_MAX_SCENES
}

fn default_scene_concurrency() -> usize {
    1
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            max_scenes: default_max_scenes(),
            scene_concurrency: default_scene_concurrency(),
            request_deadline_secs: None,
        }
    }
}

impl StoryConfig {
    pub fn settings(&self) -> StorySettings {
        StorySettings {
            max_scenes: self.max_scenes,
            scene_concurrency: self.scene_concurrency,
            request_deadline: self.request_deadline_secs.map(Duration::from_secs),
        }
    }
}

/// 异步任务配置
#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Worker 同时处理的故事任务数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 任务队列容量，满时拒绝提交
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// 已结束任务的保留时间（秒）
    #[serde(default = "default_retention")]
    pub retention_secs: u64,

    /// 清理间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_max_concurrent() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    100
}

fn default_retention() -> u64 {
    3600 // 1 小时
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            queue_capacity: default_queue_capacity(),
            retention_secs: default_retention(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
