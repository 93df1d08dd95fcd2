//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, ProviderKind};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 未在配置中提供 API Key 时读取的环境变量
const COHERE_API_KEY_ENV: &str = "COHERE_API_KEY";
const LEONARDO_API_KEY_ENV: &str = "LEONARDO_API_KEY";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STORYSTUDIO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `STORYSTUDIO_SERVER__PORT=8080`
/// - `STORYSTUDIO_NARRATIVE__PROVIDER=fake`
/// - `STORYSTUDIO_ILLUSTRATION__MAX_POLL_ATTEMPTS=20`
/// - `STORYSTUDIO_STORY__REQUEST_DEADLINE_SECS=600`
///
/// API Key 也可以直接通过 `COHERE_API_KEY` / `LEONARDO_API_KEY` 提供
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级），其余字段由 serde default 补齐
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("illustration.poll_interval_secs", 3)?
        .set_default("illustration.max_poll_attempts", 15)?
        .set_default("story.max_scenes", 10)?
        .set_default("story.scene_concurrency", 1)?
        .set_default("jobs.max_concurrent", 2)?
        .set_default("jobs.retention_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: STORYSTUDIO_ILLUSTRATION__POLL_INTERVAL_SECS=5
    builder = builder.add_source(
        Environment::with_prefix("STORYSTUDIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_api_key_fallback(&mut app_config, |name| std::env::var(name).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 配置中 API Key 为空时，从约定的环境变量补齐
fn apply_api_key_fallback<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.narrative.api_key.is_empty() {
        if let Some(key) = lookup(COHERE_API_KEY_ENV) {
            config.narrative.api_key = key;
        }
    }
    if config.illustration.api_key.is_empty() {
        if let Some(key) = lookup(LEONARDO_API_KEY_ENV) {
            config.illustration.api_key = key;
        }
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::ValidationError(msg.to_string())
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("Server port cannot be 0"));
    }

    if config.narrative.provider == ProviderKind::Remote {
        if config.narrative.base_url.is_empty() {
            return Err(invalid("Narrative base_url cannot be empty"));
        }
        if config.narrative.api_key.trim().is_empty() {
            return Err(invalid(
                "Narrative API key is missing (set narrative.api_key or COHERE_API_KEY)",
            ));
        }
    }

    if config.illustration.provider == ProviderKind::Remote {
        if config.illustration.base_url.is_empty() {
            return Err(invalid("Illustration base_url cannot be empty"));
        }
        if config.illustration.api_key.trim().is_empty() {
            return Err(invalid(
                "Illustration API key is missing (set illustration.api_key or LEONARDO_API_KEY)",
            ));
        }
    }

    if config.illustration.max_poll_attempts == 0 {
        return Err(invalid("Illustration max_poll_attempts must be at least 1"));
    }

    if config.illustration.poll_interval_secs == 0 {
        return Err(invalid("Illustration poll_interval_secs cannot be 0"));
    }

    if config.illustration.width == 0 || config.illustration.height == 0 {
        return Err(invalid("Illustration width and height must be positive"));
    }

    if config.story.max_scenes == 0 {
        return Err(invalid("Story max_scenes must be at least 1"));
    }

    if config.story.scene_concurrency == 0 {
        return Err(invalid("Story scene_concurrency must be at least 1"));
    }

    if config.story.request_deadline_secs == Some(0) {
        return Err(invalid("Story request_deadline_secs cannot be 0"));
    }

    if config.jobs.max_concurrent == 0 || config.jobs.queue_capacity == 0 {
        return Err(invalid("Jobs max_concurrent and queue_capacity must be at least 1"));
    }

    if config.jobs.sweep_interval_secs == 0 {
        return Err(invalid("Jobs sweep_interval_secs cannot be 0"));
    }

    Ok(())
}

/// 遮蔽密钥，只保留末尾 4 位
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    match chars.len() {
        0 => "<unset>".to_string(),
        n if n <= 8 => "****".to_string(),
        n => {
            let tail: String = chars[n - 4..].iter().collect();
            format!("****{}", tail)
        }
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== StoryStudio Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!(
        "Narrative: provider={} url={} key={}",
        config.narrative.provider.as_str(),
        config.narrative.base_url,
        mask_secret(&config.narrative.api_key)
    );
    tracing::info!(
        "Narrative Models: story={} ({}) prompt={} ({})",
        config.narrative.story_model,
        config.narrative.story_temperature,
        config.narrative.prompt_model,
        config.narrative.prompt_temperature
    );
    tracing::info!(
        "Illustration: provider={} url={} key={}",
        config.illustration.provider.as_str(),
        config.illustration.base_url,
        mask_secret(&config.illustration.api_key)
    );
    tracing::info!(
        "Illustration Polling: every {}s, {} attempts",
        config.illustration.poll_interval_secs,
        config.illustration.max_poll_attempts
    );
    tracing::info!(
        "Story: max_scenes={} scene_concurrency={}",
        config.story.max_scenes,
        config.story.scene_concurrency
    );
    match config.story.request_deadline_secs {
        Some(secs) => tracing::info!("Request Deadline: {}s", secs),
        None => tracing::info!("Request Deadline: none"),
    }
    tracing::info!(
        "Jobs: max_concurrent={} queue_capacity={} retention={}s",
        config.jobs.max_concurrent,
        config.jobs.queue_capacity,
        config.jobs.retention_secs
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
