use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};
use model::{
    diagnostics::RouteResolutionStats, Direction, ResolvedDirection, ResolvedRoute, Route, Stop,
};
use utility::geo;

use crate::{geometry::GeometryFetcher, resolver};

/// One generation of the route atlas: every route resolved to geometry, plus
/// the resolution stats recorded while building it.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    pub routes: HashMap<i64, ResolvedRoute>,
    pub resolution: HashMap<i64, RouteResolutionStats>,
    pub built_at: DateTime<Utc>,
}

impl RouteCatalog {
    pub fn route_for_number(&self, number: &str) -> Vec<&ResolvedRoute> {
        self.routes
            .values()
            .filter(|route| route.number == number)
            .collect()
    }
}

/// Holds the current generation behind a lock that's only taken to swap the
/// `Arc`, never while a reader is projecting a point. Readers clone the
/// `Arc` out and keep working against a consistent snapshot even if a
/// refresh lands mid-tick.
pub struct RouteIndex {
    current: RwLock<Arc<RouteCatalog>>,
}

impl RouteIndex {
    pub fn new(initial: RouteCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn snapshot(&self) -> Arc<RouteCatalog> {
        self.current.read().expect("route index lock poisoned").clone()
    }

    /// Validates the candidate catalog's arc-length tables before installing
    /// it. A non-decreasing `cumulative_distance_m` table is a structural
    /// invariant of [`geo::cumulative_distance`]; if a candidate violates it,
    /// something upstream of this call produced a broken polyline, and
    /// installing it would corrupt every projection done against it. Refuses
    /// the swap and keeps the previous generation in that case.
    pub fn publish(&self, catalog: RouteCatalog) {
        if let Err((route_id, direction)) = validate_cumulative_tables(&catalog) {
            tracing::error!(
                route_id,
                direction,
                "non-monotonic cumulative distance table; refusing to install route atlas generation"
            );
            return;
        }
        *self.current.write().expect("route index lock poisoned") = Arc::new(catalog);
    }
}

fn validate_cumulative_tables(catalog: &RouteCatalog) -> Result<(), (i64, &'static str)> {
    for route in catalog.routes.values() {
        if !is_non_decreasing(&route.forward.cumulative_distance_m) {
            return Err((route.id, "forward"));
        }
        if !is_non_decreasing(&route.reverse.cumulative_distance_m) {
            return Err((route.id, "reverse"));
        }
    }
    Ok(())
}

fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|window| window[1] >= window[0])
}

async fn build_direction(stops: Vec<Stop>, geometry: &GeometryFetcher) -> (ResolvedDirection, Vec<i64>) {
    let waypoints: Vec<(f64, f64)> = stops.iter().map(Stop::coordinates).collect();

    let (polyline, has_osrm_geometry) = match geometry.fetch_polyline(&waypoints).await {
        Some(polyline) if polyline.len() >= 2 => (polyline, true),
        _ => (waypoints.clone(), false),
    };

    let (cumulative_distance_m, length_m) = geo::cumulative_distance(&polyline);

    let mut out_of_order_stop_ids = Vec::new();
    let mut previous_distance_along_m: Option<f64> = None;
    let resolved_stops = stops
        .into_iter()
        .map(|stop| {
            let distance_along_m = geo::project_point(
                &polyline,
                &cumulative_distance_m,
                stop.latitude,
                stop.longitude,
            )
            .map(|projection| projection.distance_along_m)
            .unwrap_or(0.0);
            if previous_distance_along_m.is_some_and(|previous| distance_along_m < previous) {
                out_of_order_stop_ids.push(stop.id);
            }
            previous_distance_along_m = Some(distance_along_m);
            model::ResolvedStop {
                stop,
                distance_along_m,
            }
        })
        .collect();

    (
        ResolvedDirection {
            polyline,
            cumulative_distance_m,
            length_m,
            stops: resolved_stops,
            has_osrm_geometry,
        },
        out_of_order_stop_ids,
    )
}

async fn build_route(
    route: &Route,
    points: &HashMap<i64, Stop>,
    geometry: &GeometryFetcher,
) -> (ResolvedRoute, RouteResolutionStats) {
    let forward = resolver::resolve_path(route.path(Direction::Forward), points);
    let reverse = resolver::resolve_path(route.path(Direction::Reverse), points);

    let (forward_direction, forward_out_of_order) = build_direction(forward.stops, geometry).await;
    tokio::time::sleep(crate::geometry::REQUEST_PACING).await;
    let (reverse_direction, reverse_out_of_order) = build_direction(reverse.stops, geometry).await;
    tokio::time::sleep(crate::geometry::REQUEST_PACING).await;

    let mut unresolved_stop_ids = forward.unresolved_ids;
    unresolved_stop_ids.extend(reverse.unresolved_ids);

    let mut out_of_order_stop_ids = forward_out_of_order;
    out_of_order_stop_ids.extend(reverse_out_of_order);

    let stats = RouteResolutionStats {
        unresolved_stop_ids,
        unnamed_stop_count: forward.unnamed_count + reverse.unnamed_count,
        forward_has_osrm_geometry: forward_direction.has_osrm_geometry,
        reverse_has_osrm_geometry: reverse_direction.has_osrm_geometry,
        out_of_order_stop_ids,
    };

    let resolved = ResolvedRoute {
        id: route.id,
        number: route.number.clone(),
        name: route.name.clone(),
        color: route.color.clone(),
        forward: forward_direction,
        reverse: reverse_direction,
        unresolved_stop_ids: stats.unresolved_stop_ids.clone(),
    };

    (resolved, stats)
}

/// Rebuilds a complete route catalog from scratch. Requests to the geometry
/// fetcher are paced sequentially (see [`crate::geometry::REQUEST_PACING`]),
/// so this is expected to take seconds for a city-sized route set — it
/// always runs off to the side and is installed atomically via
/// [`RouteIndex::publish`].
pub async fn build_catalog(
    routes: &[Route],
    points: &[Stop],
    geometry: &GeometryFetcher,
) -> RouteCatalog {
    let points_by_id: HashMap<i64, Stop> =
        points.iter().map(|stop| (stop.id, stop.clone())).collect();

    let mut resolved_routes = HashMap::with_capacity(routes.len());
    let mut resolution = HashMap::with_capacity(routes.len());

    for route in routes {
        let (resolved, stats) = build_route(route, &points_by_id, geometry).await;
        if !stats.unresolved_stop_ids.is_empty() {
            tracing::warn!(
                route_id = route.id,
                unresolved = ?stats.unresolved_stop_ids,
                "route has stop ids missing from the points catalog"
            );
        }
        resolved_routes.insert(route.id, resolved);
        resolution.insert(route.id, stats);
    }

    RouteCatalog {
        routes: resolved_routes,
        resolution,
        built_at: Utc::now(),
    }
}
