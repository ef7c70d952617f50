//! # Taskpilot Model
//!
//! Generative-model boundary: the [`LlmClient`] trait, a Gemini-backed
//! implementation, and the injectable retry/deadline [`CallPolicy`].

pub mod client;
pub mod gemini;
pub mod policy;

pub use client::{LlmClient, MockLlmClient, ModelError};
pub use gemini::{GeminiClient, GeminiConfig};
pub use policy::{complete_with_policy, CallPolicy};
