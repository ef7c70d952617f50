//! Wire types for the scheduling pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Priority level for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Must be scheduled as early as dependencies allow.
    High,
    /// Normal priority (default).
    #[default]
    Medium,
    /// Scheduled when there is slack.
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "High" => Ok(Priority::High),
            "Medium" => Ok(Priority::Medium),
            "Low" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

/// A single task as supplied by the caller.
///
/// `task_name` is the join key: it must be unique within a request and is
/// what the model is told to echo back verbatim in its schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique name within the request.
    pub task_name: String,

    /// Brief free-text explanation.
    #[serde(default)]
    pub description: String,

    /// Expected effort in hours.
    pub estimated_duration: f64,

    /// Target completion date, ISO `YYYY-MM-DD`. Not validated for
    /// parseability; the model sees it as opaque text.
    pub due_date: String,

    /// Comma-separated names of tasks that must finish first. May be empty.
    /// No cycle validation is performed.
    #[serde(default)]
    pub dependencies: String,

    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
}

/// A schedule request: the full task list plus the project it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Human-readable project name, embedded in the prompt.
    pub project_name: String,

    /// Tasks in caller order. Must be non-empty.
    pub tasks: Vec<Task>,
}

impl ScheduleRequest {
    /// Validate the request before any external call is made.
    pub fn validate(&self) -> Result<()> {
        if self.project_name.trim().is_empty() {
            return Err(ScheduleError::InvalidRequest {
                message: "Missing tasks or projectName in request body.".to_string(),
            });
        }
        if self.tasks.is_empty() {
            return Err(ScheduleError::InvalidRequest {
                message: "Missing tasks or projectName in request body.".to_string(),
            });
        }
        Ok(())
    }
}

/// One scheduled entry in the model's reply, after normalization.
///
/// `task_name` is expected to match an input task but is not checked here;
/// that lenient join happens in [`crate::reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    /// Name echoed from the input list.
    pub task_name: String,

    /// Recommended start date as returned, not validated.
    pub scheduled_start_date: String,

    /// Recommended end date as returned, not validated.
    pub scheduled_end_date: String,

    /// Display/execution sequence. [`UNORDERED`](crate::contract::UNORDERED)
    /// when the model supplied nothing usable.
    pub order: i64,
}

/// The extracted schedule: narrative plus per-task entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    /// Strategy narrative. Falls back to the raw model reply when the
    /// structured part could not be recovered.
    pub description: String,

    /// Scheduled entries, possibly empty.
    pub scheduled_tasks: Vec<ScheduledTask>,
}
