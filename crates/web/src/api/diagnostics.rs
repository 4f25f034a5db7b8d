use std::sync::Arc;

use actors::actor_ref::ActorRef;
use atlas::RouteIndex;
use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use model::Diagnostics;
use pipeline::{GetDiagnostics, VehicleTracker};
use serde::Serialize;
use std::collections::HashMap;

use crate::state::WebState;

pub fn routes() -> Router<WebState> {
    Router::new().route("/", get(get_diagnostics))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticsResponse {
    #[serde(flatten)]
    tracker: Diagnostics,
    route_resolution: HashMap<i64, model::diagnostics::RouteResolutionStats>,
    catalog_built_at: DateTime<Utc>,
}

async fn get_diagnostics(
    State(tracker): State<ActorRef<VehicleTracker>>,
    State(route_index): State<Arc<RouteIndex>>,
) -> Json<DiagnosticsResponse> {
    let tracker_diagnostics = tracker.ask(GetDiagnostics).await.unwrap_or_default();
    let catalog = route_index.snapshot();
    Json(DiagnosticsResponse {
        tracker: tracker_diagnostics,
        route_resolution: catalog.resolution.clone(),
        catalog_built_at: catalog.built_at,
    })
}
