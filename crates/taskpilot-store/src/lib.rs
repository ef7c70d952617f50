//! # Taskpilot Store
//!
//! Document-store collaborator: per-user project and task records with
//! live-update subscriptions and an atomic schedule batch.

pub mod store;
pub mod subscription;

pub use store::{DocumentStore, InMemoryDocumentStore, ProjectRecord, StoreError, TaskRecord};
pub use subscription::{
    ChangeType, RecordKind, StoreEvent, StoreSubscription, SubscriptionFilter, SubscriptionManager,
};
