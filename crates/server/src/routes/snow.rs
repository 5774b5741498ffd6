use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::json;

use models::task::{Task, TaskUpdate};
use service::tasks::TaskStore;

use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sysparm_query: Option<String>,
}

/// Lists tasks, filtered by the restricted query grammar when present.
pub async fn list_tasks(
    State(store): State<Arc<TaskStore>>,
    Query(q): Query<ListQuery>,
) -> Json<serde_json::Value> {
    let tasks = store.list(q.sysparm_query.as_deref()).await;
    Json(json!({ "result": tasks }))
}

pub async fn get_task(
    State(store): State<Arc<TaskStore>>,
    Path(sys_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = store.get(&sys_id).await?;
    Ok(Json(json!({ "result": task })))
}

/// Partial task update; work_notes is append-only. A missing task answers
/// 404 with the contractual `{"error": "Task not found"}` body.
pub async fn patch_task(
    State(store): State<Arc<TaskStore>>,
    Path(sys_id): Path<String>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = store.update(&sys_id, payload).await?;
    Ok(Json(json!({ "result": task })))
}

/// Returns the entire current state of the mock ticketing database.
pub async fn dump_db(State(store): State<Arc<TaskStore>>) -> Json<IndexMap<String, Task>> {
    Json(store.dump().await)
}
