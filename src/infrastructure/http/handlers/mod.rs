//! HTTP Handlers

mod job;
mod ping;
mod story;

pub use job::*;
pub use ping::*;
pub use story::*;
