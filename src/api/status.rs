use crate::api::AppState;
use crate::models::ServiceStatus;
use crate::services::CSV_FIELDS;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn status_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/services", get(list_services))
        .route("/csv-fields", get(csv_fields))
}

/// Availability of every registered plugin
async fn list_services(State(state): State<Arc<AppState>>) -> Json<Vec<ServiceStatus>> {
    Json(state.registry.list_status())
}

async fn csv_fields() -> Json<[&'static str; 7]> {
    Json(CSV_FIELDS)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
