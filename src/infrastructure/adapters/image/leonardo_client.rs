//! Leonardo Image Client - 调用外部异步图像生成服务
//!
//! 实现 ImageGeneratorPort trait
//!
//! 外部 API:
//! POST {base_url}/generations
//!   Request: {"prompt", "modelId", "width", "height", "num_images", "alchemy",
//!             "guidance_scale", "negative_prompt"}
//!   Response: {"sdGenerationJob": {"generationId": "..."}}
//! GET  {base_url}/generations/{id}
//!   Response: {"generations_by_pk": {"status": "PENDING|COMPLETE|FAILED",
//!              "generated_images": [{"url": "..."}]}}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    GenerationId, GenerationStatus, ImageGenerationError, ImageGenerationRequest,
    ImageGeneratorPort,
};

#[derive(Debug, Serialize)]
struct LeonardoGenerationRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "modelId")]
    model_id: &'a str,
    width: u32,
    height: u32,
    num_images: u32,
    alchemy: bool,
    guidance_scale: f32,
    negative_prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct LeonardoSubmitResponse {
    #[serde(rename = "sdGenerationJob")]
    job: LeonardoJob,
}

#[derive(Debug, Deserialize)]
struct LeonardoJob {
    #[serde(rename = "generationId")]
    generation_id: String,
}

#[derive(Debug, Deserialize)]
struct LeonardoPollResponse {
    generations_by_pk: Option<LeonardoGeneration>,
}

#[derive(Debug, Deserialize)]
struct LeonardoGeneration {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    generated_images: Vec<LeonardoImage>,
}

#[derive(Debug, Deserialize)]
struct LeonardoImage {
    url: String,
}

/// Leonardo 客户端配置
#[derive(Debug, Clone)]
pub struct LeonardoImageClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 单次 HTTP 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for LeonardoImageClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud.leonardo.ai/api/rest/v1".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl LeonardoImageClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Leonardo 图像客户端
pub struct LeonardoImageClient {
    client: Client,
    config: LeonardoImageClientConfig,
}

impl LeonardoImageClient {
    /// 创建新的客户端
    pub fn new(config: LeonardoImageClientConfig) -> Result<Self, ImageGenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImageGenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generations_url(&self) -> String {
        format!("{}/generations", self.config.base_url.trim_end_matches('/'))
    }

    fn generation_url(&self, id: &GenerationId) -> String {
        format!("{}/{}", self.generations_url(), id)
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ImageGenerationError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ImageGenerationError::Unauthorized);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error_text: String = error_text.chars().take(200).collect();
            return Err(ImageGenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }
}

fn map_send_error(e: reqwest::Error) -> ImageGenerationError {
    if e.is_timeout() {
        ImageGenerationError::Timeout
    } else if e.is_connect() {
        ImageGenerationError::NetworkError(format!("Cannot connect to image service: {}", e))
    } else {
        ImageGenerationError::NetworkError(e.to_string())
    }
}

#[async_trait]
impl ImageGeneratorPort for LeonardoImageClient {
    async fn submit(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<GenerationId, ImageGenerationError> {
        let body = LeonardoGenerationRequest {
            prompt: &request.prompt,
            model_id: &request.model_id,
            width: request.width,
            height: request.height,
            num_images: request.num_images,
            alchemy: request.alchemy,
            guidance_scale: request.guidance_scale,
            negative_prompt: &request.negative_prompt,
        };

        tracing::debug!(
            url = %self.generations_url(),
            model_id = %request.model_id,
            prompt_len = request.prompt.len(),
            "Submitting generation"
        );

        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        let parsed: LeonardoSubmitResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ImageGenerationError::InvalidResponse(e.to_string()))?;

        Ok(GenerationId::new(parsed.job.generation_id))
    }

    async fn poll(&self, id: &GenerationId) -> Result<GenerationStatus, ImageGenerationError> {
        let response = self
            .client
            .get(self.generation_url(id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(map_send_error)?;

        let parsed: LeonardoPollResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ImageGenerationError::InvalidResponse(e.to_string()))?;

        let Some(generation) = parsed.generations_by_pk else {
            return Ok(GenerationStatus::Pending);
        };

        if !generation.generated_images.is_empty() {
            return Ok(GenerationStatus::Complete(
                generation
                    .generated_images
                    .into_iter()
                    .map(|image| image.url)
                    .collect(),
            ));
        }

        match generation.status.as_deref() {
            Some("FAILED") => Ok(GenerationStatus::Failed(format!(
                "generation {} failed",
                id
            ))),
            _ => Ok(GenerationStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> LeonardoImageClient {
        LeonardoImageClient::new(LeonardoImageClientConfig::new(server.url(), "leo-key")).unwrap()
    }

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest {
            prompt: "(Subject: a lighthouse)".to_string(),
            negative_prompt: "text, watermark".to_string(),
            model_id: "model-1".to_string(),
            width: 768,
            height: 768,
            num_images: 1,
            guidance_scale: 9.0,
            alchemy: false,
        }
    }

    #[tokio::test]
    async fn test_submit_returns_generation_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generations")
            .match_header("authorization", "Bearer leo-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "prompt": "(Subject: a lighthouse)",
                "modelId": "model-1",
                "width": 768,
                "num_images": 1,
                "alchemy": false,
                "negative_prompt": "text, watermark",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sdGenerationJob":{"generationId":"gen-42","apiCreditCost":10}}"#)
            .create_async()
            .await;

        let id = client(&server).submit(request()).await.unwrap();

        assert_eq!(id.as_str(), "gen-42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/generations")
            .with_status(401)
            .create_async()
            .await;

        let err = client(&server).submit(request()).await.unwrap_err();
        assert!(matches!(err, ImageGenerationError::Unauthorized));
    }

    #[tokio::test]
    async fn test_poll_pending_then_complete() {
        let mut server = mockito::Server::new_async().await;
        let pending = server
            .mock("GET", "/generations/gen-42")
            .with_status(200)
            .with_body(r#"{"generations_by_pk":{"status":"PENDING","generated_images":[]}}"#)
            .create_async()
            .await;

        let client = client(&server);
        let id = GenerationId::new("gen-42");
        assert_eq!(client.poll(&id).await.unwrap(), GenerationStatus::Pending);
        pending.remove_async().await;

        let _complete = server
            .mock("GET", "/generations/gen-42")
            .with_status(200)
            .with_body(
                r#"{"generations_by_pk":{"status":"COMPLETE","generated_images":[{"url":"https://cdn.leonardo.ai/1.jpg"},{"url":"https://cdn.leonardo.ai/2.jpg"}]}}"#,
            )
            .create_async()
            .await;

        assert_eq!(
            client.poll(&id).await.unwrap(),
            GenerationStatus::Complete(vec![
                "https://cdn.leonardo.ai/1.jpg".to_string(),
                "https://cdn.leonardo.ai/2.jpg".to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_poll_missing_generation_is_pending() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/generations/gen-7")
            .with_status(200)
            .with_body(r#"{"generations_by_pk":null}"#)
            .create_async()
            .await;

        let status = client(&server).poll(&GenerationId::new("gen-7")).await.unwrap();
        assert_eq!(status, GenerationStatus::Pending);
    }

    #[tokio::test]
    async fn test_poll_failed_generation() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/generations/gen-9")
            .with_status(200)
            .with_body(r#"{"generations_by_pk":{"status":"FAILED","generated_images":[]}}"#)
            .create_async()
            .await;

        let status = client(&server).poll(&GenerationId::new("gen-9")).await.unwrap();
        assert!(matches!(status, GenerationStatus::Failed(_)));
    }
}
