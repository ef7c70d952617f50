//! Reconciliation of extracted schedule entries against stored tasks.
//!
//! The model echoes task names back; matching is an exact, case-sensitive
//! join on that name. The model sometimes invents or mis-spells names, and
//! the default behavior is to skip those entries with a diagnostic rather
//! than fail the batch. That leniency is intentional and load-bearing.

use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::types::ScheduledTask;

/// Minimal view of a stored task needed for the join.
#[derive(Debug, Clone)]
pub struct TaskRef {
    /// Persistent record identifier.
    pub id: Uuid,
    /// Join key.
    pub task_name: String,
}

/// Schedule fields to merge into one stored task record.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskUpdate {
    pub id: Uuid,
    pub scheduled_start_date: String,
    pub scheduled_end_date: String,
    /// The reply's `order`, persisted under the scheduled-order field.
    pub scheduled_order: i64,
}

/// How to treat scheduled entries that match no known task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    /// Skip unmatched entries with a warning. The default, and the behavior
    /// the rest of the pipeline assumes.
    #[default]
    Lenient,
    /// Reject the whole batch on the first unmatched entry. Opt-in.
    Strict,
}

/// Outcome of a lenient reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOutcome {
    /// Updates for tasks that matched, in reply order.
    pub updates: Vec<TaskUpdate>,
    /// Names from the reply that matched nothing.
    pub skipped: Vec<String>,
}

/// Join `scheduled` entries onto `tasks` by exact name.
///
/// In [`ReconcileMode::Lenient`] unmatched entries land in
/// [`ReconcileOutcome::skipped`]; in [`ReconcileMode::Strict`] the first
/// unmatched entry aborts with [`ScheduleError::UnknownTask`].
pub fn reconcile(
    tasks: &[TaskRef],
    scheduled: &[ScheduledTask],
    mode: ReconcileMode,
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome::default();

    for entry in scheduled {
        match tasks.iter().find(|t| t.task_name == entry.task_name) {
            Some(task) => outcome.updates.push(TaskUpdate {
                id: task.id,
                scheduled_start_date: entry.scheduled_start_date.clone(),
                scheduled_end_date: entry.scheduled_end_date.clone(),
                scheduled_order: entry.order,
            }),
            None => {
                if mode == ReconcileMode::Strict {
                    return Err(ScheduleError::UnknownTask {
                        task_name: entry.task_name.clone(),
                    });
                }
                warn!(
                    task_name = %entry.task_name,
                    "scheduled task not found in current tasks, skipping update"
                );
                outcome.skipped.push(entry.task_name.clone());
            }
        }
    }

    Ok(outcome)
}
