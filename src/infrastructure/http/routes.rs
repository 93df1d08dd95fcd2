//! HTTP Routes
//!
//! API Endpoints:
//! - /                     GET   运行状态横幅
//! - /api/ping             GET   健康检查
//! - /api/story/generate   POST  同步生成故事（等待全部配图完成）
//! - /api/story/submit     POST  提交异步故事任务
//! - /api/story/status     POST  查询任务状态与结果

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::banner))
        .nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/story", story_routes())
}

/// Story 路由
fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_story))
        .route("/submit", post(handlers::submit_story_job))
        .route("/status", post(handlers::story_job_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use http::{Request, StatusCode};
    use serde_json::Value;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    use crate::application::test_support::{ScriptedImageGenerator, ScriptedTextGenerator};
    use crate::application::{
        GenerateStoryHandler, IllustrationService, IllustrationSettings, NarrativeService,
        StorySettings,
    };
    use crate::infrastructure::http::server::build_router;
    use crate::infrastructure::InMemoryJobManager;

    fn app(text: ScriptedTextGenerator) -> (Router, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let handler = Arc::new(GenerateStoryHandler::new(
            Arc::new(NarrativeService::new(
                Arc::new(text),
                ScriptedTextGenerator::settings(),
            )),
            Arc::new(IllustrationService::new(
                Arc::new(ScriptedImageGenerator::new()),
                IllustrationSettings::default(),
            )),
            StorySettings::default(),
        ));
        let state = AppState::new(handler, InMemoryJobManager::new(tx).arc());
        (build_router(Arc::new(state)), rx)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_banner_and_ping() {
        let (router, _rx) = app(ScriptedTextGenerator::with_scenes(&["a"]));

        let response = router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"StoryStudio Backend is Running!");

        let (status, body) = send(
            router,
            Request::builder().uri("/api/ping").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_story_returns_camel_case_story() {
        let (router, _rx) = app(ScriptedTextGenerator::with_scenes(&[
            "a lighthouse on a cliff",
            "a whale in the fog",
        ]));

        let (status, body) = send(
            router,
            post_json(
                "/api/story/generate",
                serde_json::json!({
                    "concept": "A lonely lighthouse keeper befriends a whale",
                    "genre": "Fantasy",
                    "tone": "Whimsical",
                    "sceneCount": 2
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errno"], 0);
        let scenes = body["data"]["scenes"].as_array().unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0]["sceneNumber"], 1);
        assert_eq!(scenes[1]["description"], "a whale in the fog");
        assert_eq!(scenes[1]["imageStatus"], "ready");
        assert!(scenes[1]["imageUrl"].as_str().unwrap().starts_with("https://img.test/"));
    }

    #[tokio::test]
    async fn test_generate_story_rejects_invalid_brief() {
        let (router, _rx) = app(ScriptedTextGenerator::with_scenes(&["a"]));

        let (status, body) = send(
            router,
            post_json(
                "/api/story/generate",
                serde_json::json!({ "concept": "   ", "sceneCount": 2 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errno"], 400);
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_narrative_failure_maps_to_bad_gateway() {
        let (router, _rx) = app(ScriptedTextGenerator::failing_narrative());

        let (status, body) = send(
            router,
            post_json(
                "/api/story/generate",
                serde_json::json!({ "concept": "a story", "sceneCount": 1 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["errno"], 502);
    }

    #[tokio::test]
    async fn test_submit_then_query_job() {
        let (router, mut rx) = app(ScriptedTextGenerator::with_scenes(&["a"]));

        let (status, body) = send(
            router.clone(),
            post_json(
                "/api/story/submit",
                serde_json::json!({ "concept": "a story", "scenes": 1 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"], "pending");
        let job_id = body["data"]["job_id"].as_str().unwrap().to_string();
        assert_eq!(rx.recv().await.unwrap(), job_id);

        let (status, body) = send(
            router.clone(),
            post_json("/api/story/status", serde_json::json!({ "job_id": job_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["state"], "pending");

        let (status, body) = send(
            router,
            post_json("/api/story/status", serde_json::json!({ "jobId": "missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errno"], 404);
    }
}
