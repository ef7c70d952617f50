//! Schedule extraction from raw model output.
//!
//! The model is asked for prose followed by one fenced JSON array. Replies
//! are frequently imperfect, so extraction never fails: every branch
//! degrades to a usable [`ScheduleResponse`], at worst the full raw text as
//! narrative with no structured entries.

use serde_json::Value;
use tracing::{debug, warn};

use crate::contract::{
    FENCE_CLOSE, FENCE_OPEN, FIELD_END_DATE, FIELD_ORDER, FIELD_START_DATE, FIELD_TASK_NAME,
    UNORDERED,
};
use crate::types::{ScheduleResponse, ScheduledTask};

/// Byte range of a fenced region within the raw text.
struct FencedRegion {
    /// Start of the opener.
    start: usize,
    /// One past the closer.
    end: usize,
    /// Start of the interior (after the opener line's newline).
    interior_start: usize,
    /// End of the interior (before the newline that precedes the closer).
    interior_end: usize,
}

/// Scan for the first region opened by [`FENCE_OPEN`] on its own line and
/// closed by the next [`FENCE_CLOSE`] at the start of a line.
///
/// Only the first complete region counts; anything after it, including
/// further fenced blocks, is left untouched.
fn find_first_fenced_region(text: &str) -> Option<FencedRegion> {
    let mut search_from = 0;
    loop {
        let open_rel = text[search_from..].find(FENCE_OPEN)?;
        let start = search_from + open_rel;
        let after_open = start + FENCE_OPEN.len();

        // The opener must terminate its line; otherwise keep scanning
        // (e.g. the prompt-echoed phrase "```json ```" is not a block).
        let Some(interior_start) = fence_line_end(text, after_open) else {
            search_from = after_open;
            continue;
        };

        // The closer must sit right after a newline, mirroring the
        // "narrative, blank-line, fence" shape the prompt demands.
        let mut close_from = interior_start;
        while let Some(close_rel) = text[close_from..].find(FENCE_CLOSE) {
            let close = close_from + close_rel;
            // The newline before the closer must belong to the interior,
            // not be the opener's own line ending.
            if close <= interior_start || text.as_bytes()[close - 1] != b'\n' {
                close_from = close + FENCE_CLOSE.len();
                continue;
            }
            return Some(FencedRegion {
                start,
                end: close + FENCE_CLOSE.len(),
                interior_start,
                interior_end: close - 1,
            });
        }

        // Opener without a closer: no structured block.
        return None;
    }
}

/// If `from` points at the end of the opener's line (optionally after a
/// carriage return), return the index just past the newline.
fn fence_line_end(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(from) {
        Some(b'\n') => Some(from + 1),
        Some(b'\r') if bytes.get(from + 1) == Some(&b'\n') => Some(from + 2),
        _ => None,
    }
}

/// Coerce an optional JSON value to a string field.
///
/// Strings pass through, numbers render, and everything else (missing,
/// null, bool, object, array) becomes the empty string. Never fails.
fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Coerce an optional JSON value to an order number.
///
/// Integers are kept, floats truncate, numeric strings parse; anything else
/// (including a missing field) yields the [`UNORDERED`] sentinel.
fn coerce_order(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(UNORDERED),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(UNORDERED)
        }
        _ => UNORDERED,
    }
}

/// Normalize one parsed array element into a [`ScheduledTask`].
///
/// Total over arbitrary JSON: a non-object element simply produces empty
/// fields and the sentinel order.
fn normalize_element(element: &Value) -> ScheduledTask {
    ScheduledTask {
        task_name: coerce_string(element.get(FIELD_TASK_NAME)),
        scheduled_start_date: coerce_string(element.get(FIELD_START_DATE)),
        scheduled_end_date: coerce_string(element.get(FIELD_END_DATE)),
        order: coerce_order(element.get(FIELD_ORDER)),
    }
}

/// Extract a [`ScheduleResponse`] from raw model output.
///
/// Branches:
/// - no fenced block: the whole text becomes the narrative, no entries;
/// - fenced block with a valid JSON array: narrative is the text with the
///   block (delimiters included) removed and trimmed, entries normalized;
/// - fenced block with anything else inside: the whole *original* text
///   becomes the narrative, no entries.
///
/// Degraded branches are logged but still succeed; "some answer is better
/// than none" is the operating principle here.
pub fn extract_schedule(raw: &str) -> ScheduleResponse {
    let Some(region) = find_first_fenced_region(raw) else {
        warn!("model reply contained no fenced JSON block; returning narrative only");
        return ScheduleResponse {
            description: raw.to_string(),
            scheduled_tasks: Vec::new(),
        };
    };

    let interior = &raw[region.interior_start..region.interior_end];
    match serde_json::from_str::<Value>(interior) {
        Ok(Value::Array(elements)) => {
            let scheduled_tasks: Vec<ScheduledTask> =
                elements.iter().map(normalize_element).collect();
            let mut description = String::with_capacity(raw.len());
            description.push_str(&raw[..region.start]);
            description.push_str(&raw[region.end..]);
            let description = description.trim().to_string();
            debug!(count = scheduled_tasks.len(), "extracted scheduled tasks");
            ScheduleResponse {
                description,
                scheduled_tasks,
            }
        }
        Ok(other) => {
            warn!(
                json_type = json_type_name(&other),
                "fenced block held valid JSON but not an array; returning narrative only"
            );
            ScheduleResponse {
                description: raw.to_string(),
                scheduled_tasks: Vec::new(),
            }
        }
        Err(err) => {
            warn!(error = %err, "fenced block held invalid JSON; returning narrative only");
            ScheduleResponse {
                description: raw.to_string(),
                scheduled_tasks: Vec::new(),
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
