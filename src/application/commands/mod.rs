//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：故事生成与任务提交

mod story_commands;

pub mod handlers;

pub use story_commands::*;
