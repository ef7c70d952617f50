//! Model client trait and errors.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the generative-model boundary.
///
/// All variants are transport-level: a reply that *arrives* but carries no
/// parseable schedule is not an error here, it degrades downstream in the
/// extractor.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The HTTP request could not be made or completed.
    #[error("http error: {0}")]
    Http(String),

    /// The backend answered with an error status or payload.
    #[error("response error: {0}")]
    Response(String),

    /// The backend's envelope could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The call exceeded the configured deadline.
    #[error("model call exceeded deadline of {deadline_ms}ms")]
    Timeout { deadline_ms: u64 },
}

/// A generative-text backend: one prompt in, one text reply out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single prompt and return the raw reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

#[async_trait]
impl LlmClient for Arc<dyn LlmClient> {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        (**self).complete(prompt).await
    }
}

/// Canned-response client for tests and examples.
pub struct MockLlmClient {
    pub response: String,
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, ModelError> {
        Ok(self.response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_returns_canned_response() {
        let client = MockLlmClient {
            response: "hello".to_string(),
        };
        assert_eq!(client.complete("prompt").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_arc_dyn_client_delegates() {
        let client: Arc<dyn LlmClient> = Arc::new(MockLlmClient {
            response: "via arc".to_string(),
        });
        assert_eq!(client.complete("prompt").await.unwrap(), "via arc");
    }
}
