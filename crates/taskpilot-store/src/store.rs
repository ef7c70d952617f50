//! Document store implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskpilot_core::contract::UNORDERED;
use taskpilot_core::{Task, TaskUpdate};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::subscription::{ChangeType, RecordKind, StoreEvent, SubscriptionManager};

/// Store errors.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Record does not exist.
    #[error("{resource_type} {id} not found")]
    NotFound { resource_type: String, id: Uuid },
}

/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// A stored project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Record identifier.
    pub id: Uuid,

    /// Opaque identifier from the identity provider. All reads are scoped
    /// by it.
    pub owner_id: String,

    /// Display name, also embedded into prompts.
    pub project_name: String,

    /// Narrative from the most recent schedule run, if any.
    pub schedule_description: Option<String>,

    /// When the last schedule batch was applied.
    pub last_scheduled_at: Option<DateTime<Utc>>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Monotonic insertion sequence, breaks creation-time ties.
    pub seq: u64,
}

/// A stored task with its optional schedule fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Record identifier.
    pub id: Uuid,

    /// Owning project.
    pub project_id: Uuid,

    /// The task as supplied by the caller.
    #[serde(flatten)]
    pub task: Task,

    /// Merged from the last schedule run.
    pub scheduled_start_date: Option<String>,

    /// Merged from the last schedule run.
    pub scheduled_end_date: Option<String>,

    /// Merged from the last schedule run; the reply's `order` field.
    pub scheduled_order: Option<i64>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Monotonic insertion sequence, breaks creation-time ties.
    pub seq: u64,
}

/// Trait for the project/task document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a project owned by `owner_id`.
    async fn create_project(&self, owner_id: &str, project_name: &str) -> ProjectRecord;

    /// Get a project by ID.
    async fn get_project(&self, id: Uuid) -> Option<ProjectRecord>;

    /// List an owner's projects in creation order.
    async fn list_projects(&self, owner_id: &str) -> Vec<ProjectRecord>;

    /// List an owner's projects that carry a schedule narrative, in
    /// creation order.
    async fn list_scheduled_projects(&self, owner_id: &str) -> Vec<ProjectRecord>;

    /// Add a task to a project.
    async fn add_task(&self, project_id: Uuid, task: Task) -> Result<TaskRecord>;

    /// Add several tasks under one write lock (bulk import path).
    async fn add_tasks(&self, project_id: Uuid, tasks: Vec<Task>) -> Result<Vec<TaskRecord>>;

    /// List a project's tasks in creation order.
    async fn list_tasks(&self, project_id: Uuid) -> Vec<TaskRecord>;

    /// List a project's tasks by scheduled order. Unscheduled tasks and the
    /// unordered sentinel sort last; creation order breaks ties.
    async fn list_tasks_by_order(&self, project_id: Uuid) -> Vec<TaskRecord>;

    /// Delete a task. Returns false if it did not exist.
    async fn delete_task(&self, id: Uuid) -> bool;

    /// Apply one schedule batch atomically: the project narrative and
    /// timestamp plus every task update take effect together.
    async fn apply_schedule(
        &self,
        project_id: Uuid,
        description: &str,
        updates: &[TaskUpdate],
    ) -> Result<usize>;
}

/// In-memory implementation of [`DocumentStore`].
pub struct InMemoryDocumentStore {
    projects: Arc<RwLock<HashMap<Uuid, ProjectRecord>>>,
    tasks: Arc<RwLock<HashMap<Uuid, TaskRecord>>>,
    seq: Arc<RwLock<u64>>,
    subscriptions: SubscriptionManager,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            projects: Arc::new(RwLock::new(HashMap::new())),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            seq: Arc::new(RwLock::new(0)),
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Access the live-update subscription manager.
    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    async fn next_seq(&self) -> u64 {
        let mut seq = self.seq.write().await;
        *seq += 1;
        *seq
    }

    fn publish(&self, project_id: Uuid, kind: RecordKind, change_type: ChangeType) {
        self.subscriptions.publish(StoreEvent {
            project_id,
            kind,
            change_type,
            timestamp: Utc::now(),
        });
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_project(&self, owner_id: &str, project_name: &str) -> ProjectRecord {
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            project_name: project_name.to_string(),
            schedule_description: None,
            last_scheduled_at: None,
            created_at: Utc::now(),
            seq: self.next_seq().await,
        };

        let mut projects = self.projects.write().await;
        projects.insert(record.id, record.clone());
        drop(projects);

        self.publish(record.id, RecordKind::Project, ChangeType::Created);
        record
    }

    async fn get_project(&self, id: Uuid) -> Option<ProjectRecord> {
        let projects = self.projects.read().await;
        projects.get(&id).cloned()
    }

    async fn list_projects(&self, owner_id: &str) -> Vec<ProjectRecord> {
        let projects = self.projects.read().await;
        let mut records: Vec<ProjectRecord> = projects
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by_key(|p| p.seq);
        records
    }

    async fn list_scheduled_projects(&self, owner_id: &str) -> Vec<ProjectRecord> {
        let mut records = self.list_projects(owner_id).await;
        records.retain(|p| p.schedule_description.is_some());
        records
    }

    async fn add_task(&self, project_id: Uuid, task: Task) -> Result<TaskRecord> {
        let records = self.add_tasks(project_id, vec![task]).await?;
        Ok(records.into_iter().next().expect("one task was inserted"))
    }

    async fn add_tasks(&self, project_id: Uuid, tasks: Vec<Task>) -> Result<Vec<TaskRecord>> {
        {
            let projects = self.projects.read().await;
            if !projects.contains_key(&project_id) {
                return Err(StoreError::NotFound {
                    resource_type: "project".to_string(),
                    id: project_id,
                });
            }
        }

        let mut records = Vec::with_capacity(tasks.len());
        let mut stored = self.tasks.write().await;
        for task in tasks {
            let record = TaskRecord {
                id: Uuid::new_v4(),
                project_id,
                task,
                scheduled_start_date: None,
                scheduled_end_date: None,
                scheduled_order: None,
                created_at: Utc::now(),
                seq: self.next_seq().await,
            };
            stored.insert(record.id, record.clone());
            records.push(record);
        }
        drop(stored);

        for _ in &records {
            self.publish(project_id, RecordKind::Task, ChangeType::Created);
        }
        Ok(records)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Vec<TaskRecord> {
        let tasks = self.tasks.read().await;
        let mut records: Vec<TaskRecord> = tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        records.sort_by_key(|t| t.seq);
        records
    }

    async fn list_tasks_by_order(&self, project_id: Uuid) -> Vec<TaskRecord> {
        let mut records = self.list_tasks(project_id).await;
        records.sort_by_key(|t| (t.scheduled_order.unwrap_or(UNORDERED), t.seq));
        records
    }

    async fn delete_task(&self, id: Uuid) -> bool {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(&id);
        drop(tasks);

        match removed {
            Some(record) => {
                self.publish(record.project_id, RecordKind::Task, ChangeType::Deleted);
                true
            }
            None => false,
        }
    }

    async fn apply_schedule(
        &self,
        project_id: Uuid,
        description: &str,
        updates: &[TaskUpdate],
    ) -> Result<usize> {
        // Both locks held for the whole batch: the narrative and every task
        // update become visible together or not at all.
        let mut projects = self.projects.write().await;
        let mut tasks = self.tasks.write().await;

        let project = projects
            .get_mut(&project_id)
            .ok_or_else(|| StoreError::NotFound {
                resource_type: "project".to_string(),
                id: project_id,
            })?;

        project.schedule_description = Some(description.to_string());
        project.last_scheduled_at = Some(Utc::now());

        let mut applied = 0;
        for update in updates {
            if let Some(record) = tasks.get_mut(&update.id) {
                record.scheduled_start_date = Some(update.scheduled_start_date.clone());
                record.scheduled_end_date = Some(update.scheduled_end_date.clone());
                record.scheduled_order = Some(update.scheduled_order);
                applied += 1;
            }
        }

        drop(tasks);
        drop(projects);

        self.publish(project_id, RecordKind::Project, ChangeType::Updated);
        for _ in 0..applied {
            self.publish(project_id, RecordKind::Task, ChangeType::Updated);
        }
        tracing::info!(%project_id, applied, "schedule batch applied");
        Ok(applied)
    }
}
