//! Story Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoryError {
    #[error("Story concept cannot be empty")]
    EmptyConcept,

    #[error("Scene count must be between 1 and {max}, got {requested}")]
    SceneCountOutOfRange { requested: u32, max: u32 },
}
