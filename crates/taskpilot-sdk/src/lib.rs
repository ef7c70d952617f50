//! # Taskpilot SDK
//!
//! Thin client for the Taskpilot scheduling server.

pub mod client;

pub use client::{SdkError, TaskpilotClient};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::{SdkError, TaskpilotClient};
    pub use taskpilot_core::{
        Priority, ScheduleRequest, ScheduleResponse, ScheduledTask, Task,
    };
}
