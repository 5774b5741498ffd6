use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use models::client::{resource_url, Client, ClientUpdate, NewClient};
use service::clients::ClientStore;

use crate::errors::ApiError;

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    pub hostname: Option<String>,
}

/// Finds clients; filters by hostname (case-insensitive) when given.
pub async fn find_clients(
    State(store): State<Arc<ClientStore>>,
    Query(q): Query<FindQuery>,
) -> Json<serde_json::Value> {
    let clients = store.find(q.hostname.as_deref()).await;
    Json(json!({ "clients": clients }))
}

/// Creates a new client resource; answers 201 with the generated clientId
/// and a Location header pointing at the new resource.
pub async fn create_client(
    State(store): State<Arc<ClientStore>>,
    Json(payload): Json<NewClient>,
) -> Result<impl IntoResponse, ApiError> {
    let client = store.create(payload).await?;
    let location = resource_url(&client.resource_id.id);
    info!(hostname = %client.hostname, location = %location, "client create handled");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(json!({ "clientId": client.client_id })),
    ))
}

/// Updates an existing client record identified by its resourceId.id.
pub async fn patch_client(
    State(store): State<Arc<ClientStore>>,
    Path(resource_id): Path<String>,
    Json(payload): Json<ClientUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let client = store.update(&resource_id, payload).await?;
    Ok(Json(json!({ "client": client })))
}

/// Returns the entire current state of the mock client database.
pub async fn dump_db(State(store): State<Arc<ClientStore>>) -> Json<IndexMap<String, Client>> {
    Json(store.dump().await)
}
