//! # Taskpilot Core
//!
//! Pure scheduling pipeline: prompt construction, tolerant schedule
//! extraction, and reconciliation of the extracted schedule against
//! caller-owned task records.
//!
//! The crate owns no state and performs no I/O; the generative-model call
//! and persistence sit on either side of it:
//!
//! ```text
//! tasks -> build_prompt -> (model call) -> extract_schedule -> reconcile
//! ```

pub mod contract;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod reconcile;
pub mod types;

// Re-exports for convenience
pub use error::{Result, ScheduleError};
pub use extract::extract_schedule;
pub use prompt::build_prompt;
pub use reconcile::{reconcile, ReconcileMode, ReconcileOutcome, TaskRef, TaskUpdate};
pub use types::{Priority, ScheduleRequest, ScheduleResponse, ScheduledTask, Task};
