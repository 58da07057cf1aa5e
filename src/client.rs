//! HTTP transport to the remote chat endpoint.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

/// Request body for one chat turn. The endpoint receives the newest user
/// message alongside the full history snapshot taken at send time.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub newest_message: String,
    pub conversation_history: Vec<String>,
}

/// Response body from the chat endpoint. A well-formed success carries
/// `reply`; the error path carries an optional `error` string instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    pub reply: Option<String>,
    pub error: Option<String>,
}

/// Transport seam consumed by the controller. Kept as a trait so turns can
/// be exercised without a live endpoint.
#[async_trait]
pub trait ChatApi {
    /// Send one message with the full history snapshot and return the
    /// decoded response. Non-2xx statuses are failures regardless of body.
    async fn send_message(&self, newest_message: &str, history: &[String]) -> Result<ChatResponse>;
}

/// Chat client backed by reqwest
#[derive(Clone)]
pub struct ChatClient {
    config: Config,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }
}

#[async_trait]
impl ChatApi for ChatClient {
    async fn send_message(&self, newest_message: &str, history: &[String]) -> Result<ChatResponse> {
        let payload = ChatRequest {
            newest_message: newest_message.to_string(),
            conversation_history: history.to_vec(),
        };

        tracing::debug!(
            endpoint = %self.config.endpoint_url,
            history_len = history.len(),
            "sending chat request"
        );

        let response = self
            .client
            .post(&self.config.endpoint_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Chat endpoint error ({}): {}", status, error_text));
        }

        let decoded = response.json::<ChatResponse>().await?;
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_the_production_contract() {
        let request = ChatRequest {
            newest_message: "hello".to_string(),
            conversation_history: vec!["hello".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["newest_message"], "hello");
        assert_eq!(json["conversation_history"], serde_json::json!(["hello"]));
    }

    #[test]
    fn response_tolerates_missing_fields() {
        let decoded: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.reply.is_none());
        assert!(decoded.error.is_none());

        let decoded: ChatResponse = serde_json::from_str(r#"{"reply":"hi"}"#).unwrap();
        assert_eq!(decoded.reply.as_deref(), Some("hi"));
    }
}
