//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod image_generator;
mod job_manager;
mod progress;
mod text_generator;

pub use image_generator::{
    GenerationId, GenerationStatus, ImageGenerationError, ImageGenerationRequest,
    ImageGeneratorPort,
};
pub use job_manager::{JobError, JobManagerPort, JobState, StoryJob};
pub use progress::{NoProgress, StoryProgress};
pub use text_generator::{TextGenerationError, TextGenerationRequest, TextGeneratorPort};
