//! Shared prompt/response contract.
//!
//! The prompt builder promises the model a response format and the extractor
//! assumes the same format when parsing. Both sides read the literals from
//! here, so a wording change cannot silently break parsing.

/// Opens the structured part of the reply.
pub const FENCE_OPEN: &str = "```json";

/// Closes the structured part of the reply.
pub const FENCE_CLOSE: &str = "```";

/// Field name the model must echo verbatim from the input list.
pub const FIELD_TASK_NAME: &str = "taskName";

/// Field name for the recommended start date.
pub const FIELD_START_DATE: &str = "scheduledStartDate";

/// Field name for the recommended end date.
pub const FIELD_END_DATE: &str = "scheduledEndDate";

/// Field name for the display/execution sequence.
pub const FIELD_ORDER: &str = "order";

/// Sentinel order meaning "unordered/unset". Sorts last in listings.
pub const UNORDERED: i64 = 999;
