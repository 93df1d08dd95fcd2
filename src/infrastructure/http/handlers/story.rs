//! Story HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::story::Story;
use crate::infrastructure::http::dto::{ApiResponse, StoryBriefRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 同步生成故事
///
/// 请求会一直挂起到所有场景配图完成（或失败/超时）
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StoryBriefRequest>,
) -> Result<Json<ApiResponse<Story>>, ApiError> {
    tracing::info!(
        genre = %req.genre,
        tone = %req.tone,
        scene_count = req.scene_count,
        "Story generation requested"
    );

    let story = state.generate_story_handler.handle(req.into()).await?;

    Ok(Json(ApiResponse::success(story)))
}
