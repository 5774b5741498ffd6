use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{clients::ClientStore, tasks::TaskStore};

pub mod networker;
pub mod snow;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn trace_layer() -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

/// Router for the backup-management mock.
pub fn build_networker_router(store: Arc<ClientStore>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/nwrestapi/v3/global/clients",
            get(networker::find_clients).post(networker::create_client),
        )
        .route(
            "/nwrestapi/v3/global/clients/:resource_id",
            patch(networker::patch_client),
        )
        .route("/debug/dump_db", get(networker::dump_db))
        .with_state(store)
        .layer(cors)
        .layer(trace_layer())
}

/// Router for the ticketing mock.
pub fn build_snow_router(store: Arc<TaskStore>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/now/v2/table/sc_task", get(snow::list_tasks))
        .route(
            "/api/now/v2/table/sc_task/:sys_id",
            get(snow::get_task).patch(snow::patch_task),
        )
        .route("/debug/dump_db", get(snow::dump_db))
        .with_state(store)
        .layer(cors)
        .layer(trace_layer())
}
