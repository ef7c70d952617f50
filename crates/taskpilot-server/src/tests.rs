//! Router-level tests with a mock model client.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use taskpilot_model::{CallPolicy, LlmClient, MockLlmClient, ModelError};
use taskpilot_store::InMemoryDocumentStore;

use crate::create_router;
use crate::state::AppState;

const ALLOWED_ORIGIN: &str = "http://localhost:3000";

const GOOD_REPLY: &str = "Plan the design work first, then build on it.\n\n```json\n[{\"taskName\":\"Design\",\"scheduledStartDate\":\"2025-07-28\",\"scheduledEndDate\":\"2025-07-30\",\"order\":1}]\n```";

/// A model client whose call always fails at the transport level.
struct BrokenClient;

#[async_trait]
impl LlmClient for BrokenClient {
    async fn complete(&self, _prompt: &str) -> Result<String, ModelError> {
        Err(ModelError::Http("connection refused".to_string()))
    }
}

fn server_with(model: Arc<dyn LlmClient>) -> TestServer {
    let state = AppState::new(
        model,
        Arc::new(InMemoryDocumentStore::new()),
        CallPolicy::single_shot(),
    );
    TestServer::new(create_router(state, ALLOWED_ORIGIN).unwrap()).unwrap()
}

fn server_with_reply(reply: &str) -> TestServer {
    server_with(Arc::new(MockLlmClient {
        response: reply.to_string(),
    }))
}

fn user(name: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_static(name),
    )
}

fn schedule_body() -> Value {
    json!({
        "projectName": "Launch",
        "tasks": [{
            "taskName": "Design",
            "estimatedDuration": 4,
            "dueDate": "2025-08-01",
            "dependencies": "",
            "priority": "High"
        }]
    })
}

#[tokio::test]
async fn test_health_check() {
    let server = server_with_reply("unused");
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_schedule_happy_path() {
    let server = server_with_reply(GOOD_REPLY);
    let response = server.post("/schedule").json(&schedule_body()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(
        body["description"],
        "Plan the design work first, then build on it."
    );
    let tasks = body["scheduledTasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["taskName"], "Design");
    assert_eq!(tasks[0]["order"], 1);
}

#[tokio::test]
async fn test_schedule_missing_project_name_is_400() {
    let server = server_with_reply(GOOD_REPLY);
    let response = server
        .post("/schedule")
        .json(&json!({ "tasks": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_schedule_empty_task_list_is_400() {
    let server = server_with_reply(GOOD_REPLY);
    let response = server
        .post("/schedule")
        .json(&json!({ "projectName": "Launch", "tasks": [] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transport_failure_is_500() {
    let server = server_with(Arc::new(BrokenClient));
    let response = server.post("/schedule").json(&schedule_body()).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>()["error"],
        "Failed to get schedule from AI. Please try again later."
    );
}

#[tokio::test]
async fn test_unparseable_reply_still_succeeds_degraded() {
    let raw = "Some thoughts, but no structured schedule this time.";
    let server = server_with_reply(raw);
    let response = server.post("/schedule").json(&schedule_body()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["description"], raw);
    assert!(body["scheduledTasks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_project_schedule_persists_and_skips_unknown_names() {
    let reply = "Strategy: design first.\n\n```json\n[\n  {\"taskName\":\"Design\",\"scheduledStartDate\":\"2025-07-28\",\"scheduledEndDate\":\"2025-07-30\",\"order\":1},\n  {\"taskName\":\"Invented\",\"scheduledStartDate\":\"2025-08-01\",\"scheduledEndDate\":\"2025-08-02\",\"order\":2}\n]\n```";
    let server = server_with_reply(reply);
    let (header, value) = user("alice");

    let project = server
        .post("/projects")
        .add_header(header.clone(), value.clone())
        .json(&json!({ "projectName": "Launch" }))
        .await;
    assert_eq!(project.status_code(), StatusCode::CREATED);
    let project_id = project.json::<Value>()["id"].as_str().unwrap().to_string();

    let task = server
        .post(&format!("/projects/{}/tasks", project_id))
        .json(&json!({
            "taskName": "Design",
            "estimatedDuration": 4,
            "dueDate": "2025-08-01"
        }))
        .await;
    assert_eq!(task.status_code(), StatusCode::CREATED);

    let scheduled = server
        .post(&format!("/projects/{}/schedule", project_id))
        .await;
    assert_eq!(scheduled.status_code(), StatusCode::OK);
    let body = scheduled.json::<Value>();
    assert_eq!(body["applied"], 1);
    assert_eq!(body["skipped"], json!(["Invented"]));
    assert_eq!(body["description"], "Strategy: design first.");

    // The batch is visible: the task carries schedule fields now.
    let tasks = server
        .get(&format!("/projects/{}/tasks", project_id))
        .add_query_param("sort", "scheduled")
        .await;
    let records = tasks.json::<Value>();
    assert_eq!(records[0]["scheduledStartDate"], "2025-07-28");
    assert_eq!(records[0]["scheduledOrder"], 1);

    // And the project shows up in the schedules view.
    let schedules = server
        .get("/schedules")
        .add_header(header, value)
        .await;
    let list = schedules.json::<Value>();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["scheduleDescription"], "Strategy: design first.");
}

#[tokio::test]
async fn test_schedule_for_missing_project_is_404() {
    let server = server_with_reply(GOOD_REPLY);
    let response = server
        .post("/projects/00000000-0000-0000-0000-000000000000/schedule")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_projects_are_scoped_to_the_calling_user() {
    let server = server_with_reply("unused");
    let (header, value) = user("alice");

    server
        .post("/projects")
        .add_header(header.clone(), value.clone())
        .json(&json!({ "projectName": "Mine" }))
        .await;

    let (other_header, other_value) = user("bob");
    let bobs = server
        .get("/projects")
        .add_header(other_header, other_value)
        .await;
    assert!(bobs.json::<Value>().as_array().unwrap().is_empty());

    let mine = server.get("/projects").add_header(header, value).await;
    assert_eq!(mine.json::<Value>().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_import_rejects_unrecognized_url() {
    let server = server_with_reply("unused");
    let (header, value) = user("alice");

    let project = server
        .post("/projects")
        .add_header(header, value)
        .json(&json!({ "projectName": "Launch" }))
        .await;
    let project_id = project.json::<Value>()["id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/projects/{}/import", project_id))
        .json(&json!({ "url": "https://example.com/not-a-sheet" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_task() {
    let server = server_with_reply("unused");
    let (header, value) = user("alice");

    let project = server
        .post("/projects")
        .add_header(header, value)
        .json(&json!({ "projectName": "Launch" }))
        .await;
    let project_id = project.json::<Value>()["id"].as_str().unwrap().to_string();

    let task = server
        .post(&format!("/projects/{}/tasks", project_id))
        .json(&json!({
            "taskName": "Doomed",
            "estimatedDuration": 1,
            "dueDate": "2025-08-01"
        }))
        .await;
    let task_id = task.json::<Value>()["id"].as_str().unwrap().to_string();

    let deleted = server.delete(&format!("/tasks/{}", task_id)).await;
    assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

    let again = server.delete(&format!("/tasks/{}", task_id)).await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}
