use std::sync::Arc;

use actors::actor_ref::ActorRef;
use atlas::RouteIndex;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use pipeline::{GetSnapshot, VehicleTracker};
use serde_json::json;

use crate::state::WebState;

pub fn routes() -> Router<WebState> {
    Router::new().route("/", get(health))
}

/// Healthy as soon as either the route atlas or the vehicle state table has
/// something in it; unavailable only in the narrow startup window before
/// either has been populated for the first time.
async fn health(
    State(route_index): State<Arc<RouteIndex>>,
    State(tracker): State<ActorRef<VehicleTracker>>,
) -> impl IntoResponse {
    let catalog_ready = !route_index.snapshot().routes.is_empty();
    let state_ready = !tracker.ask(GetSnapshot).await.unwrap_or_default().is_empty();

    if catalog_ready || state_ready {
        (StatusCode::OK, Json(json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable" })),
        )
    }
}
