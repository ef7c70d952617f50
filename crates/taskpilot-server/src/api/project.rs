//! Project and task endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use taskpilot_core::Task;
use taskpilot_store::{DocumentStore, ProjectRecord, TaskRecord};
use uuid::Uuid;

use crate::api::schedule::ErrorBody;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorBody>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Resolve the calling user from the identity header. The identity provider
/// itself is an external collaborator; the server only threads its opaque
/// identifier through to the store.
fn owner_id(headers: &HeaderMap) -> String {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("anonymous")
        .to_string()
}

/// Request to create a project.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_name: String,
}

/// `POST /projects`
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectRecord>), ApiError> {
    if req.project_name.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "projectName must not be empty."));
    }
    let record = state
        .store
        .create_project(&owner_id(&headers), req.project_name.trim())
        .await;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /projects` — the calling user's projects in creation order.
pub async fn list_projects(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Vec<ProjectRecord>> {
    Json(state.store.list_projects(&owner_id(&headers)).await)
}

/// `GET /schedules` — projects that carry a schedule narrative.
pub async fn list_schedules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Vec<ProjectRecord>> {
    Json(state.store.list_scheduled_projects(&owner_id(&headers)).await)
}

/// `POST /projects/:id/tasks`
pub async fn add_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(task): Json<Task>,
) -> Result<(StatusCode, Json<TaskRecord>), ApiError> {
    let record = state
        .store
        .add_task(id, task)
        .await
        .map_err(|e| error(StatusCode::NOT_FOUND, e.to_string()))?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Listing options for a project's tasks.
#[derive(Debug, Deserialize, Default)]
pub struct TaskListQuery {
    /// `created` (default) or `scheduled`.
    pub sort: Option<String>,
}

/// `GET /projects/:id/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskRecord>>, ApiError> {
    if state.store.get_project(id).await.is_none() {
        return Err(error(
            StatusCode::NOT_FOUND,
            format!("Project {} not found", id),
        ));
    }
    let records = match query.sort.as_deref() {
        Some("scheduled") => state.store.list_tasks_by_order(id).await,
        _ => state.store.list_tasks(id).await,
    };
    Ok(Json(records))
}

/// `DELETE /tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_task(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(error(
            StatusCode::NOT_FOUND,
            format!("Task {} not found", id),
        ))
    }
}

/// Request to import tasks from a published spreadsheet.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub url: String,
}

/// Import result.
#[derive(Debug, serde::Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

/// `POST /projects/:id/import` — fetch a CSV/TSV source and bulk-add the
/// parsed tasks.
pub async fn import_tasks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let tasks = taskpilot_import::fetch_tasks(&req.url).await.map_err(|e| {
        let status = match e {
            taskpilot_import::ImportError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        error(status, e.to_string())
    })?;

    if tasks.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "No valid tasks found in the sheet. Check headers (Task Name, Estimated Duration, Due Date, etc.) and data.",
        ));
    }

    let records = state
        .store
        .add_tasks(id, tasks)
        .await
        .map_err(|e| error(StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Json(ImportResponse {
        imported: records.len(),
    }))
}
