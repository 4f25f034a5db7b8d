use actors::actor_ref::ActorRef;
use axum::{
    extract::{Path, State},
    http::Method,
    routing::get,
    Json, Router,
};
use model::VehicleState;
use pipeline::{GetSnapshot, GetVehicle, VehicleTracker};

use crate::{
    common::{RouteErrorResponse, RouteResult},
    state::WebState,
};

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/:id", get(get_vehicle))
}

async fn list_vehicles(State(tracker): State<ActorRef<VehicleTracker>>) -> Json<Vec<VehicleState>> {
    Json(tracker.ask(GetSnapshot).await.unwrap_or_default())
}

async fn get_vehicle(
    State(tracker): State<ActorRef<VehicleTracker>>,
    Path(id): Path<String>,
) -> RouteResult<Json<VehicleState>> {
    match tracker.ask(GetVehicle(id.clone())).await.ok().flatten() {
        Some(vehicle) => Ok(Json(vehicle)),
        None => Err(RouteErrorResponse::not_found(
            &Method::GET,
            format!("/api/vehicles/{id}"),
        )),
    }
}
