//! Cohere Chat Client - 调用外部文本生成服务
//!
//! 实现 TextGeneratorPort trait
//!
//! 外部 API:
//! POST {base_url}/v1/chat
//! Request: {"model": "...", "message": "...", "temperature": 0.7}  (JSON, Bearer token)
//! Response: {"text": "...", ...}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{TextGenerationError, TextGenerationRequest, TextGeneratorPort};

/// 错误响应体在日志和错误信息中保留的最大长度
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Serialize)]
struct CohereChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CohereChatResponse {
    text: String,
}

/// Cohere 客户端配置
#[derive(Debug, Clone)]
pub struct CohereChatClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for CohereChatClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cohere.com".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

impl CohereChatClientConfig {
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

/// Cohere 聊天客户端
pub struct CohereChatClient {
    client: Client,
    config: CohereChatClientConfig,
}

impl CohereChatClient {
    /// 创建新的客户端
    pub fn new(config: CohereChatClientConfig) -> Result<Self, TextGenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TextGenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat", self.config.base_url.trim_end_matches('/'))
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl TextGeneratorPort for CohereChatClient {
    async fn chat(&self, request: TextGenerationRequest) -> Result<String, TextGenerationError> {
        let body = CohereChatRequest {
            model: &request.model,
            message: &request.message,
            temperature: request.temperature,
        };

        tracing::debug!(
            url = %self.chat_url(),
            model = %request.model,
            temperature = request.temperature,
            message_len = request.message.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TextGenerationError::Timeout
                } else if e.is_connect() {
                    TextGenerationError::NetworkError(format!(
                        "Cannot connect to text service: {}",
                        e
                    ))
                } else {
                    TextGenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TextGenerationError::Unauthorized);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TextGenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status,
                truncate(&error_text)
            )));
        }

        let parsed: CohereChatResponse = response
            .json()
            .await
            .map_err(|e| TextGenerationError::InvalidResponse(e.to_string()))?;

        tracing::debug!(
            model = %request.model,
            response_len = parsed.text.len(),
            "Chat request completed"
        );

        Ok(parsed.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn request() -> TextGenerationRequest {
        TextGenerationRequest {
            model: "command".to_string(),
            message: "Describe a lighthouse".to_string(),
            temperature: 0.3,
        }
    }

    #[test]
    fn test_config_builder() {
        let config = CohereChatClientConfig::new("http://example.com:9000", "key").with_timeout(60);
        assert_eq!(config.base_url, "http://example.com:9000");
        assert_eq!(config.api_key, "key");
        assert_eq!(config.timeout_secs, 60);
    }

    #[tokio::test]
    async fn test_chat_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "command",
                "message": "Describe a lighthouse",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text":"A white tower on black rocks","generation_id":"abc"}"#)
            .create_async()
            .await;

        let client =
            CohereChatClient::new(CohereChatClientConfig::new(server.url(), "test-key")).unwrap();
        let text = client.chat(request()).await.unwrap();

        assert_eq!(text, "A white tower on black rocks");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_chat_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat")
            .with_status(401)
            .with_body(r#"{"message":"invalid api token"}"#)
            .create_async()
            .await;

        let client =
            CohereChatClient::new(CohereChatClientConfig::new(server.url(), "bad")).unwrap();
        let err = client.chat(request()).await.unwrap_err();

        assert!(matches!(err, TextGenerationError::Unauthorized));
    }

    #[tokio::test]
    async fn test_chat_service_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client =
            CohereChatClient::new(CohereChatClientConfig::new(server.url(), "key")).unwrap();
        let err = client.chat(request()).await.unwrap_err();

        match err {
            TextGenerationError::ServiceError(msg) => assert!(msg.contains("503")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_missing_text_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"finish_reason":"ERROR"}"#)
            .create_async()
            .await;

        let client =
            CohereChatClient::new(CohereChatClientConfig::new(server.url(), "key")).unwrap();
        let err = client.chat(request()).await.unwrap_err();

        assert!(matches!(err, TextGenerationError::InvalidResponse(_)));
    }

    #[test]
    fn test_truncate_error_body() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), MAX_ERROR_BODY);
        assert_eq!(truncate("short"), "short");
    }
}
