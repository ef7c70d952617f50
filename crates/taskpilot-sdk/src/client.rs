//! Taskpilot client implementation.

use serde::Deserialize;
use taskpilot_core::{ScheduleRequest, ScheduleResponse};
use thiserror::Error;
use tracing::debug;

/// SDK errors.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The server could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with an error payload.
    #[error("server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a Taskpilot server.
#[derive(Clone)]
pub struct TaskpilotClient {
    /// Base URL of the server.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

impl TaskpilotClient {
    /// Connect to a Taskpilot server, verifying it with a health check.
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        let base_url = url.trim_end_matches('/').to_string();
        let http_client = reqwest::Client::new();

        let health_url = format!("{}/health", base_url);
        http_client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| SdkError::Connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| SdkError::Connection(e.to_string()))?;

        debug!(%base_url, "connected to taskpilot server");
        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Request a schedule for a task list.
    ///
    /// A degraded reply (narrative without structured entries) is a success
    /// here too; only transport and validation failures error.
    pub async fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, SdkError> {
        let url = format!("{}/schedule", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SdkError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "unknown server error".to_string());
            return Err(SdkError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ScheduleResponse>()
            .await
            .map_err(|e| SdkError::Serialization(e.to_string()))
    }
}
