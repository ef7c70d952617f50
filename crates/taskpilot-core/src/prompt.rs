//! Prompt construction.
//!
//! Pure rendering of a [`ScheduleRequest`] into the single prompt sent to
//! the generative model. The instructions promise the two-part response
//! format the extractor expects, using the literals from [`crate::contract`].

use std::fmt::Write;

use chrono::NaiveDate;

use crate::contract::{
    FENCE_CLOSE, FENCE_OPEN, FIELD_END_DATE, FIELD_ORDER, FIELD_START_DATE, FIELD_TASK_NAME,
};
use crate::types::ScheduleRequest;

/// Render one task line: `<i>. Task Name: "<name>" | ... | Priority: "<p>"`.
fn task_line(index: usize, task: &crate::types::Task) -> String {
    format!(
        "{}. Task Name: \"{}\" | Description: \"{}\" | Duration: {} hours | Due Date: {} | Dependencies: \"{}\" | Priority: \"{}\"",
        index + 1,
        task.task_name,
        task.description,
        task.estimated_duration,
        task.due_date,
        task.dependencies,
        task.priority,
    )
}

/// Build the scheduling prompt for a validated request.
///
/// `today` is passed in rather than read from the clock so that rendering
/// stays deterministic; it is shown to the model in en-US `M/D/YYYY` order.
///
/// Callers must reject invalid requests first ([`ScheduleRequest::validate`]);
/// this function has no failure mode of its own.
pub fn build_prompt(request: &ScheduleRequest, today: NaiveDate) -> String {
    let task_list = request
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| task_line(i, task))
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::new();
    prompt.push_str(
        "You are an AI-powered project scheduler. Your goal is to provide an optimal task schedule and insightful advice for efficient project completion.\n\n",
    );
    let _ = writeln!(prompt, "Project Name: \"{}\"", request.project_name);
    let _ = writeln!(prompt, "Current Date: {}", today.format("%-m/%-d/%Y"));
    prompt.push('\n');
    prompt.push_str("Here is a list of tasks for the project:\n");
    prompt.push_str(&task_list);
    prompt.push_str("\n\n");

    prompt.push_str("For each task, I have provided:\n");
    prompt.push_str("- Task Name: A unique identifier for the task.\n");
    prompt.push_str("- Description: A brief explanation.\n");
    prompt.push_str("- Estimated Duration: The time in hours expected to complete the task.\n");
    prompt.push_str("- Due Date: The target completion date (YYYY-MM-DD).\n");
    prompt.push_str(
        "- Dependencies: Other task names that must be completed BEFORE this task can start (comma-separated). If none, it will be empty.\n",
    );
    prompt.push_str("- Priority: \"High\", \"Medium\", or \"Low\".\n\n");

    prompt.push_str("Please provide your response in two parts:\n\n");

    prompt.push_str("**Part 1: Scheduling Strategy and Efficiency Tips**\n");
    prompt.push_str(
        "Provide a detailed description (at least 3-4 paragraphs) on how you prioritized and scheduled these tasks. Include specific strategies you used (e.g., critical path, dependency management, high-priority first, breaking down large tasks). Offer actionable tips to complete the project faster and more efficiently, like \"focus on research before development\" or \"parallelize independent tasks where possible.\"\n\n",
    );

    prompt.push_str("**Part 2: Scheduled Tasks (JSON Format)**\n");
    prompt.push_str(
        "Provide the optimized schedule for each task as a JSON array. Each object in the array MUST contain the following fields:\n",
    );
    let _ = writeln!(
        prompt,
        "- `{}`: The exact task name from the input list.",
        FIELD_TASK_NAME
    );
    let _ = writeln!(
        prompt,
        "- `{}`: The recommended start date for the task (YYYY-MM-DD format).",
        FIELD_START_DATE
    );
    let _ = writeln!(
        prompt,
        "- `{}`: The recommended end date for the task (YYYY-MM-DD format).",
        FIELD_END_DATE
    );
    let _ = writeln!(
        prompt,
        "- `{}`: A numerical value representing the sequence in which tasks should be displayed/executed (e.g., 1, 2, 3...).",
        FIELD_ORDER
    );
    prompt.push('\n');

    prompt.push_str("Example of Part 2 JSON format:\n");
    prompt.push_str(FENCE_OPEN);
    prompt.push('\n');
    prompt.push_str(
        "[\n  {\n    \"taskName\": \"Task A\",\n    \"scheduledStartDate\": \"2025-07-15\",\n    \"scheduledEndDate\": \"2025-07-17\",\n    \"order\": 1\n  },\n  {\n    \"taskName\": \"Task B\",\n    \"scheduledStartDate\": \"2025-07-18\",\n    \"scheduledEndDate\": \"2025-07-20\",\n    \"order\": 2\n  }\n]\n",
    );
    prompt.push_str(FENCE_CLOSE);
    prompt.push_str("\n\n");

    let _ = writeln!(
        prompt,
        "Remember to provide ONLY the JSON block in Part 2, clearly marked with {} {} delimiters. Ensure the JSON is valid.",
        FENCE_OPEN, FENCE_CLOSE
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, ScheduleRequest, Task};

    fn request() -> ScheduleRequest {
        ScheduleRequest {
            project_name: "Launch".to_string(),
            tasks: vec![
                Task {
                    task_name: "Design".to_string(),
                    description: "Mockups".to_string(),
                    estimated_duration: 4.0,
                    due_date: "2025-08-01".to_string(),
                    dependencies: String::new(),
                    priority: Priority::High,
                },
                Task {
                    task_name: "Build".to_string(),
                    description: String::new(),
                    estimated_duration: 16.0,
                    due_date: "2025-08-10".to_string(),
                    dependencies: "Design".to_string(),
                    priority: Priority::Medium,
                },
            ],
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
    }

    #[test]
    fn test_prompt_contains_project_and_current_date() {
        let prompt = build_prompt(&request(), today());
        assert!(prompt.contains("Project Name: \"Launch\""));
        assert!(prompt.contains("Current Date: 7/20/2025"));
    }

    #[test]
    fn test_prompt_enumerates_tasks_in_input_order() {
        let prompt = build_prompt(&request(), today());
        let design = prompt
            .find("1. Task Name: \"Design\" | Description: \"Mockups\" | Duration: 4 hours | Due Date: 2025-08-01 | Dependencies: \"\" | Priority: \"High\"")
            .expect("first task line present");
        let build = prompt
            .find("2. Task Name: \"Build\" | Description: \"\" | Duration: 16 hours | Due Date: 2025-08-10 | Dependencies: \"Design\" | Priority: \"Medium\"")
            .expect("second task line present");
        assert!(design < build);
    }

    #[test]
    fn test_prompt_mentions_each_task_exactly_once_in_task_list() {
        let prompt = build_prompt(&request(), today());
        assert_eq!(prompt.matches("Task Name: \"Design\"").count(), 1);
        assert_eq!(prompt.matches("Task Name: \"Build\"").count(), 1);
    }

    #[test]
    fn test_prompt_carries_the_fence_contract() {
        let prompt = build_prompt(&request(), today());
        // One fenced example plus one literal mention in the closing instruction.
        assert_eq!(prompt.matches(FENCE_OPEN).count(), 2);
        assert!(prompt.contains("ONLY the JSON block in Part 2"));
        for field in [FIELD_TASK_NAME, FIELD_START_DATE, FIELD_END_DATE, FIELD_ORDER] {
            assert!(prompt.contains(&format!("`{}`", field)));
        }
    }

    #[test]
    fn test_single_digit_duration_renders_without_trailing_zeroes() {
        let prompt = build_prompt(&request(), today());
        assert!(prompt.contains("Duration: 4 hours"));
        assert!(!prompt.contains("Duration: 4.0 hours"));
    }
}
