//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：异步任务状态

mod job_queries;

pub mod handlers;

pub use job_queries::*;
