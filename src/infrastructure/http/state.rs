//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    GenerateStoryHandler, GetStoryJobHandler, JobManagerPort, SubmitStoryJobHandler,
};

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub generate_story_handler: Arc<GenerateStoryHandler>,
    pub submit_story_job_handler: SubmitStoryJobHandler,

    // ========== Query Handlers ==========
    pub get_story_job_handler: GetStoryJobHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// 编排器与后台 Worker 共享同一个实例
    pub fn new(
        generate_story_handler: Arc<GenerateStoryHandler>,
        job_manager: Arc<dyn JobManagerPort>,
    ) -> Self {
        let max_scenes = generate_story_handler.settings().max_scenes;
        Self {
            generate_story_handler,
            submit_story_job_handler: SubmitStoryJobHandler::new(job_manager.clone(), max_scenes),
            get_story_job_handler: GetStoryJobHandler::new(job_manager),
        }
    }
}
