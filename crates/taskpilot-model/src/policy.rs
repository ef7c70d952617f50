//! Call policy applied around the single-call contract.
//!
//! The pipeline itself issues exactly one model call per schedule request
//! and knows nothing about retries or deadlines. Callers that want bounded
//! latency or automatic retry wrap the call with a [`CallPolicy`]; the
//! prompt builder and extractor stay retry-agnostic.

use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::client::{LlmClient, ModelError};

/// Retry/backoff/deadline policy for one logical model call.
#[derive(Debug, Clone)]
pub struct CallPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub backoff: Duration,
    /// Overall deadline across all attempts. None = wait indefinitely.
    pub deadline: Option<Duration>,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_millis(500),
            deadline: None,
        }
    }
}

impl CallPolicy {
    /// Policy with no retries and no deadline: the raw single-call contract.
    pub fn single_shot() -> Self {
        Self::default()
    }

    /// Set the retry count.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the overall deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Run `client.complete(prompt)` under `policy`.
///
/// Retries cover transport failures only; a reply that arrives is final even
/// if its content later turns out to be unparseable. Abandoning the returned
/// future cancels the in-flight attempt.
pub async fn complete_with_policy<C: LlmClient>(
    client: &C,
    prompt: &str,
    policy: &CallPolicy,
) -> Result<String, ModelError> {
    let attempts = async {
        let mut backoff = policy.backoff;
        let mut attempt = 0u32;
        loop {
            match client.complete(prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) if attempt < policy.max_retries => {
                    attempt += 1;
                    warn!(
                        error = %err,
                        attempt,
                        max_retries = policy.max_retries,
                        "model call failed, retrying"
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => return Err(err),
            }
        }
    };

    match policy.deadline {
        Some(deadline) => timeout(deadline, attempts).await.unwrap_or(Err(
            ModelError::Timeout {
                deadline_ms: deadline.as_millis() as u64,
            },
        )),
        None => attempts.await,
    }
}
