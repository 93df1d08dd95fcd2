//! 应用服务 - 两个生成式服务之上的领域逻辑

mod illustration_service;
mod narrative_service;

pub use illustration_service::{
    IllustrationService, IllustrationSettings, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use narrative_service::{NarrativeService, NarrativeSettings};
