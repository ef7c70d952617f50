//! Application state.

use std::sync::Arc;

use taskpilot_model::{CallPolicy, LlmClient};
use taskpilot_store::InMemoryDocumentStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The generative-model client.
    pub model: Arc<dyn LlmClient>,

    /// The document store.
    pub store: Arc<InMemoryDocumentStore>,

    /// Retry/deadline policy applied around each model call.
    pub policy: CallPolicy,
}

impl AppState {
    /// Create application state from its collaborators.
    pub fn new(
        model: Arc<dyn LlmClient>,
        store: Arc<InMemoryDocumentStore>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            model,
            store,
            policy,
        }
    }
}
