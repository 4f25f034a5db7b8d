use std::sync::Arc;

use atlas::RouteIndex;
use axum::{
    extract::{Path, State},
    http::Method,
    routing::get,
    Json, Router,
};
use model::ResolvedDirection;
use serde::Serialize;

use crate::{
    common::{RouteErrorResponse, RouteResult},
    state::WebState,
};

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectionDto {
    length_m: f64,
    has_osrm_geometry: bool,
    geometry: Vec<(f64, f64)>,
    stops: Vec<StopOnRouteDto>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StopOnRouteDto {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    distance_along_m: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteDto {
    id: i64,
    number: String,
    name: String,
    color: Option<String>,
    forward: DirectionDto,
    reverse: DirectionDto,
}

/// Lightweight shape for the route list: enough to draw a route on a map
/// without paying for full stop detail on every entry.
#[derive(Serialize)]
struct RouteSummaryDto {
    id: i64,
    number: String,
    name: String,
    color: Option<String>,
    stop_ids: Vec<i64>,
    geometry: Vec<(f64, f64)>,
}

fn direction_dto(direction: &ResolvedDirection) -> DirectionDto {
    DirectionDto {
        length_m: direction.length_m,
        has_osrm_geometry: direction.has_osrm_geometry,
        geometry: direction.polyline.clone(),
        stops: direction
            .stops
            .iter()
            .map(|resolved| StopOnRouteDto {
                id: resolved.stop.id,
                name: resolved.stop.name.clone(),
                latitude: resolved.stop.latitude,
                longitude: resolved.stop.longitude,
                distance_along_m: resolved.distance_along_m,
            })
            .collect(),
    }
}

async fn list_routes(State(route_index): State<Arc<RouteIndex>>) -> Json<Vec<RouteSummaryDto>> {
    let catalog = route_index.snapshot();
    let routes = catalog
        .routes
        .values()
        .map(|route| RouteSummaryDto {
            id: route.id,
            number: route.number.clone(),
            name: route.name.clone(),
            color: route.color.clone(),
            stop_ids: route.forward.stops.iter().map(|resolved| resolved.stop.id).collect(),
            geometry: route.forward.polyline.clone(),
        })
        .collect();
    Json(routes)
}

async fn get_route(
    State(route_index): State<Arc<RouteIndex>>,
    Path(id): Path<i64>,
) -> RouteResult<Json<RouteDto>> {
    let catalog = route_index.snapshot();
    let route = catalog.routes.get(&id).ok_or_else(|| {
        RouteErrorResponse::not_found(&Method::GET, format!("/api/routes/{id}"))
    })?;
    Ok(Json(RouteDto {
        id: route.id,
        number: route.number.clone(),
        name: route.name.clone(),
        color: route.color.clone(),
        forward: direction_dto(&route.forward),
        reverse: direction_dto(&route.reverse),
    }))
}
