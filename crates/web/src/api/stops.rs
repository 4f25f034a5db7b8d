use std::{collections::HashMap, sync::Arc};

use actors::actor_ref::ActorRef;
use atlas::RouteIndex;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use model::{Stop, VehicleState};
use pipeline::{eta, GetSnapshot, VehicleTracker};
use serde::{Deserialize, Serialize};

use crate::state::WebState;

pub fn routes() -> Router<WebState> {
    Router::new()
        .route("/", get(list_stops))
        .route("/:id/arrivals", get(arrivals_at))
}

async fn list_stops(State(route_index): State<Arc<RouteIndex>>) -> Json<Vec<Stop>> {
    let catalog = route_index.snapshot();
    let mut by_id: HashMap<i64, Stop> = HashMap::new();
    for route in catalog.routes.values() {
        for direction in [&route.forward, &route.reverse] {
            for resolved in &direction.stops {
                by_id.entry(resolved.stop.id).or_insert_with(|| resolved.stop.clone());
            }
        }
    }
    let mut stops: Vec<Stop> = by_id.into_values().collect();
    stops.sort_by_key(|stop| stop.id);
    Json(stops)
}

#[derive(Deserialize)]
struct ArrivalsQuery {
    route: Option<String>,
}

#[derive(Serialize)]
struct ArrivalsResponse {
    stop_id: i64,
    stop_name: String,
    arrivals: Vec<Arrival>,
}

#[derive(Serialize)]
struct Arrival {
    vehicle_id: String,
    board_num: String,
    route: String,
    route_id: Option<i64>,
    eta_seconds: Option<f64>,
}

async fn arrivals_at(
    State(route_index): State<Arc<RouteIndex>>,
    State(tracker): State<ActorRef<VehicleTracker>>,
    Path(stop_id): Path<i64>,
    Query(query): Query<ArrivalsQuery>,
) -> Json<ArrivalsResponse> {
    let vehicles = tracker.ask(GetSnapshot).await.unwrap_or_default();

    let route_filter = query.route.as_deref();
    let mut arrivals = Vec::new();
    let mut routes_with_tier1_hit = std::collections::HashSet::new();
    let mut stop_name_from_tier1 = None;

    for vehicle in &vehicles {
        if let Some(wanted) = route_filter {
            if vehicle.route != wanted {
                continue;
            }
        }
        if let Some(next) = vehicle.next_stops.iter().find(|next| next.id == stop_id) {
            routes_with_tier1_hit.insert(vehicle.route.clone());
            stop_name_from_tier1.get_or_insert_with(|| next.name.clone());
            arrivals.push(Arrival {
                vehicle_id: vehicle.id.clone(),
                board_num: vehicle.board_num.clone(),
                route: vehicle.route.clone(),
                route_id: vehicle.route_id,
                eta_seconds: next.eta_seconds,
            });
        }
    }

    let catalog = route_index.snapshot();
    let stop_lookup = catalog.routes.values().find_map(|route| {
        [&route.forward, &route.reverse]
            .into_iter()
            .find_map(|direction| {
                direction
                    .stops
                    .iter()
                    .find(|resolved| resolved.stop.id == stop_id)
                    .map(|resolved| (resolved.stop.name.clone(), resolved.stop.latitude, resolved.stop.longitude))
            })
    });

    let Some((stop_name, stop_lat, stop_lon)) = stop_lookup else {
        return Json(ArrivalsResponse {
            stop_id,
            stop_name: stop_name_from_tier1.unwrap_or_default(),
            arrivals,
        });
    };

    for vehicle in fallback_candidates(&vehicles, route_filter, &routes_with_tier1_hit) {
        let distance_m =
            utility::geo::haversine_distance(vehicle.latitude, vehicle.longitude, stop_lat, stop_lon) * 1000.0;
        if let Some(eta_seconds) = eta::compute_eta(distance_m, vehicle.speed_kmh) {
            arrivals.push(Arrival {
                vehicle_id: vehicle.id.clone(),
                board_num: vehicle.board_num.clone(),
                route: vehicle.route.clone(),
                route_id: vehicle.route_id,
                eta_seconds: Some(eta_seconds),
            });
        }
    }

    Json(ArrivalsResponse {
        stop_id,
        stop_name,
        arrivals,
    })
}

fn fallback_candidates<'a>(
    vehicles: &'a [VehicleState],
    route_filter: Option<&str>,
    routes_with_tier1_hit: &std::collections::HashSet<String>,
) -> Vec<&'a VehicleState> {
    vehicles
        .iter()
        .filter(|vehicle| route_filter.map_or(true, |wanted| vehicle.route == wanted))
        .filter(|vehicle| !routes_with_tier1_hit.contains(&vehicle.route))
        .collect()
}
