//! Live-update subscriptions for store changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Which collection a change touched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Project,
    Task,
}

/// Type of store change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// New record created.
    Created,
    /// Existing record updated.
    Updated,
    /// Record deleted.
    Deleted,
}

/// A store change event pushed to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// Project the change belongs to.
    pub project_id: Uuid,

    /// Collection touched.
    pub kind: RecordKind,

    /// Type of change.
    pub change_type: ChangeType,

    /// Timestamp of the change.
    pub timestamp: DateTime<Utc>,
}

/// Filter for subscriptions.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    /// Only events for this project.
    pub project_id: Option<Uuid>,

    /// Only events for this collection.
    pub kind: Option<RecordKind>,
}

impl SubscriptionFilter {
    /// Filter to one project's events.
    pub fn project(project_id: Uuid) -> Self {
        Self {
            project_id: Some(project_id),
            ..Default::default()
        }
    }

    /// Check if an event matches this filter.
    pub fn matches(&self, event: &StoreEvent) -> bool {
        if let Some(project_id) = self.project_id {
            if event.project_id != project_id {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if event.kind != kind {
                return false;
            }
        }
        true
    }
}

/// A subscription to store changes. Events arrive unfiltered on `receiver`;
/// callers apply `filter` locally via [`SubscriptionFilter::matches`].
pub struct StoreSubscription {
    /// Filter for this subscription.
    pub filter: SubscriptionFilter,

    /// Receiver for events.
    pub receiver: broadcast::Receiver<StoreEvent>,
}

impl StoreSubscription {
    /// Wait for the next event matching the filter.
    pub async fn next_matching(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Fan-out point for store change events.
pub struct SubscriptionManager {
    sender: broadcast::Sender<StoreEvent>,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self { sender }
    }

    /// Subscribe with a filter.
    pub fn subscribe(&self, filter: SubscriptionFilter) -> StoreSubscription {
        StoreSubscription {
            filter,
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish a change event. Dropped silently when nobody listens.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
