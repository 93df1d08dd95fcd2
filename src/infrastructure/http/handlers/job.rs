//! Story Job HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetStoryJob, SubmitStoryJobCommand};
use crate::domain::story::Story;
use crate::infrastructure::http::dto::{ApiResponse, StoryBriefRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Submit Job
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SubmitStoryJobResponseDto {
    pub job_id: String,
    pub state: String,
}

pub async fn submit_story_job(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryBriefRequest>,
) -> Result<Json<ApiResponse<SubmitStoryJobResponseDto>>, ApiError> {
    let cmd = SubmitStoryJobCommand { story: req.into() };

    let result = state.submit_story_job_handler.handle(cmd)?;

    Ok(Json(ApiResponse::success(SubmitStoryJobResponseDto {
        job_id: result.job_id,
        state: result.state.as_str().to_string(),
    })))
}

// ============================================================================
// Query Job Status
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StoryJobStatusRequest {
    #[serde(alias = "jobId")]
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct StoryJobStatusDto {
    pub job_id: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_scene: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_scenes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story: Option<Story>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn story_job_status(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryJobStatusRequest>,
) -> Result<Json<ApiResponse<StoryJobStatusDto>>, ApiError> {
    let status = state.get_story_job_handler.handle(GetStoryJob {
        job_id: req.job_id,
    })?;

    Ok(Json(ApiResponse::success(StoryJobStatusDto {
        job_id: status.job_id,
        state: status.state.as_str().to_string(),
        current_scene: status.current_scene,
        total_scenes: status.total_scenes,
        story: status.story,
        error: status.error,
    })))
}
