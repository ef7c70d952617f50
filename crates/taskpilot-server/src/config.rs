//! Server configuration from the environment.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use taskpilot_model::CallPolicy;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Credential for the generative-model backend. Required.
    pub gemini_api_key: String,

    /// Model name to request.
    pub gemini_model: String,

    /// Listen port.
    pub port: u16,

    /// The single origin allowed by CORS.
    pub allowed_origin: String,

    /// Overall deadline for one schedule call, in seconds. 0 disables it.
    pub model_deadline_secs: u64,

    /// Retries applied around the model call.
    pub model_retries: u32,
}

impl ServerConfig {
    /// Load configuration from the environment.
    ///
    /// Fails fast when `GEMINI_API_KEY` is absent so the process never comes
    /// up unable to serve its one real endpoint.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = match std::env::var("GEMINI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ => bail!(
                "Gemini API key is missing. Please set GEMINI_API_KEY in the environment or .env file."
            ),
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().context("PORT is not a valid port number")?,
            Err(_) => 5000,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            port,
            allowed_origin: std::env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            model_deadline_secs: std::env::var("MODEL_DEADLINE_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(120),
            model_retries: std::env::var("MODEL_RETRIES")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0),
        })
    }

    /// The call policy this configuration implies.
    pub fn call_policy(&self) -> CallPolicy {
        let policy = CallPolicy::single_shot().with_retries(self.model_retries);
        if self.model_deadline_secs == 0 {
            policy
        } else {
            policy.with_deadline(Duration::from_secs(self.model_deadline_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_policy_honors_zero_deadline() {
        let config = ServerConfig {
            gemini_api_key: "k".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            port: 5000,
            allowed_origin: "http://localhost:3000".to_string(),
            model_deadline_secs: 0,
            model_retries: 2,
        };
        let policy = config.call_policy();
        assert!(policy.deadline.is_none());
        assert_eq!(policy.max_retries, 2);
    }
}
