//! StoryStudio - 图文故事生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story: 创作简报、场景、配图结果、故事聚合
//! - 风格表、指令模板、叙事解析
//!
//! 应用层 (application/):
//! - Ports: TextGenerator, ImageGenerator, JobManager, StoryProgress
//! - Services: NarrativeService, IllustrationService
//! - Commands: GenerateStory（编排器）, SubmitStoryJob
//! - Queries: GetStoryJob
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Cohere / Leonardo HTTP 客户端与离线假实现
//! - HTTP: RESTful API
//! - Memory: 异步任务登记表
//! - Worker: StoryWorker 后台任务处理

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
