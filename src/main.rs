//! StoryStudio - 图文故事生成服务
//!
//! 启动流程：配置 → 日志 → 生成服务客户端 → 编排器 → 任务 Worker → HTTP

use std::sync::Arc;
use std::time::Duration;

use storystudio::application::{
    GenerateStoryHandler, IllustrationService, ImageGeneratorPort, JobManagerPort,
    NarrativeService, TextGeneratorPort,
};
use storystudio::config::{load_config, print_config, AppConfig, LogConfig, ProviderKind};
use storystudio::infrastructure::adapters::{
    CohereChatClient, CohereChatClientConfig, FakeImageClient, FakeImageClientConfig,
    FakeTextClient, FakeTextClientConfig, LeonardoImageClient, LeonardoImageClientConfig,
};
use storystudio::infrastructure::http::{AppState, HttpServer, ServerConfig};
use storystudio::infrastructure::{
    run_job_sweeper, InMemoryJobManager, StoryWorker, StoryWorkerConfig,
};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "StoryStudio starting");
    print_config(&config);

    // 生成服务客户端
    let text_generator = build_text_generator(&config)?;
    let image_generator = build_image_generator(&config)?;

    // 编排器（同步接口与 Worker 共用）
    let narrative = Arc::new(NarrativeService::new(
        text_generator,
        config.narrative.settings(),
    ));
    let illustration = Arc::new(IllustrationService::new(
        image_generator,
        config.illustration.settings(),
    ));
    let story_handler = Arc::new(GenerateStoryHandler::new(
        narrative,
        illustration,
        config.story.settings(),
    ));

    // 任务队列与内存任务登记表
    let (job_tx, job_rx) = mpsc::channel(config.jobs.queue_capacity);
    let job_manager: Arc<dyn JobManagerPort> = InMemoryJobManager::new(job_tx).arc();

    let worker = StoryWorker::new(
        StoryWorkerConfig {
            max_concurrent: config.jobs.max_concurrent,
        },
        job_rx,
        job_manager.clone(),
        story_handler.clone(),
    );
    tokio::spawn(worker.run());

    tokio::spawn(run_job_sweeper(
        job_manager.clone(),
        Duration::from_secs(config.jobs.sweep_interval_secs),
        Duration::from_secs(config.jobs.retention_secs),
    ));

    // HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(story_handler, job_manager);
    let server = HttpServer::new(server_config, state);

    server.run_with_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置
fn init_tracing(log: &LogConfig) {
    let log_filter = format!(
        "{},storystudio={},tower_http=debug",
        log.level, log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

fn build_text_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn TextGeneratorPort>> {
    let narrative = &config.narrative;
    match narrative.provider {
        ProviderKind::Remote => {
            let client_config =
                CohereChatClientConfig::new(&narrative.base_url, &narrative.api_key)
                    .with_timeout(narrative.timeout_secs);
            Ok(Arc::new(CohereChatClient::new(client_config)?))
        }
        ProviderKind::Fake => {
            tracing::warn!("Using fake text generator, stories are canned");
            Ok(Arc::new(FakeTextClient::new(FakeTextClientConfig {
                prompt_model: narrative.prompt_model.clone(),
                ..FakeTextClientConfig::default()
            })))
        }
    }
}

fn build_image_generator(config: &AppConfig) -> anyhow::Result<Arc<dyn ImageGeneratorPort>> {
    let illustration = &config.illustration;
    match illustration.provider {
        ProviderKind::Remote => {
            let client_config =
                LeonardoImageClientConfig::new(&illustration.base_url, &illustration.api_key)
                    .with_timeout(illustration.timeout_secs);
            Ok(Arc::new(LeonardoImageClient::new(client_config)?))
        }
        ProviderKind::Fake => {
            tracing::warn!("Using fake image generator, images are placeholders");
            Ok(Arc::new(FakeImageClient::new(FakeImageClientConfig::default())))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
