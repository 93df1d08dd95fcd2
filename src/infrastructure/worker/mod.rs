//! Worker Layer - Background Task Processing
//!
//! 实现 StoryWorker，处理异步故事任务

mod story_worker;

pub use story_worker::{run_job_sweeper, StoryWorker, StoryWorkerConfig};
