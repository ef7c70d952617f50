//! Scheduling endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Local;
use serde::Serialize;
use taskpilot_core::{
    build_prompt, extract_schedule, reconcile, ReconcileMode, ScheduleRequest, ScheduleResponse,
    TaskRef,
};
use taskpilot_model::complete_with_policy;
use taskpilot_store::DocumentStore;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::AppState;

/// Error payload: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn not_found(message: impl Into<String>) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Validate, prompt, call the model once, extract.
///
/// Transport failures surface as 500; an unparseable reply does NOT, it
/// degrades inside [`extract_schedule`] and still returns 200 upstream.
async fn run_pipeline(
    state: &AppState,
    request: &ScheduleRequest,
) -> Result<ScheduleResponse, ApiError> {
    request.validate().map_err(|e| bad_request(e.to_string()))?;

    let prompt = build_prompt(request, Local::now().date_naive());
    info!(
        project = %request.project_name,
        task_count = request.tasks.len(),
        "requesting schedule from model"
    );

    let raw = complete_with_policy(&state.model, &prompt, &state.policy)
        .await
        .map_err(|e| {
            error!(error = %e, "model call failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to get schedule from AI. Please try again later.".to_string(),
                }),
            )
        })?;

    Ok(extract_schedule(&raw))
}

/// `POST /schedule` — stateless pipeline over caller-supplied tasks.
pub async fn schedule(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|_| bad_request("Missing tasks or projectName in request body."))?;

    let response = run_pipeline(&state, &request).await?;
    Ok(Json(response))
}

/// Response for a project-scoped schedule run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectScheduleResponse {
    /// The strategy narrative, as persisted on the project.
    pub description: String,

    /// Normalized entries from the model reply.
    pub scheduled_tasks: Vec<taskpilot_core::ScheduledTask>,

    /// Task records updated by the batch.
    pub applied: usize,

    /// Reply names that matched no stored task. Informational only.
    pub skipped: Vec<String>,
}

/// `POST /projects/:id/schedule` — run the pipeline over a project's stored
/// tasks, then reconcile and persist the outcome as one batch.
pub async fn schedule_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectScheduleResponse>, ApiError> {
    let project = state
        .store
        .get_project(id)
        .await
        .ok_or_else(|| not_found(format!("Project {} not found", id)))?;

    let records = state.store.list_tasks(id).await;
    let request = ScheduleRequest {
        project_name: project.project_name.clone(),
        tasks: records.iter().map(|r| r.task.clone()).collect(),
    };

    let response = run_pipeline(&state, &request).await?;

    let refs: Vec<TaskRef> = records
        .iter()
        .map(|r| TaskRef {
            id: r.id,
            task_name: r.task.task_name.clone(),
        })
        .collect();

    // Lenient by default: entries naming unknown tasks are skipped, never
    // fatal. Strict mode exists in the core for callers that opt in.
    let outcome = reconcile(&refs, &response.scheduled_tasks, ReconcileMode::Lenient)
        .map_err(|e| bad_request(e.to_string()))?;

    let applied = state
        .store
        .apply_schedule(id, &response.description, &outcome.updates)
        .await
        .map_err(|e| not_found(e.to_string()))?;

    Ok(Json(ProjectScheduleResponse {
        description: response.description,
        scheduled_tasks: response.scheduled_tasks,
        applied,
        skipped: outcome.skipped,
    }))
}
