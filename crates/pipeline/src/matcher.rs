use atlas::RouteCatalog;
use model::{Direction, RawVehicle};
use utility::geo;

/// Largest perpendicular distance, in meters, a vehicle may sit from a
/// route's polyline and still be considered on that route.
pub const MAX_SNAP_DISTANCE_M: f64 = 300.0;

/// Bearing differences within this many degrees of each other are treated
/// as a tie, broken by whichever candidate snapped closer.
const BEARING_TIE_EPSILON_DEG: f64 = 1.0;

pub struct MatchResult {
    pub route_id: i64,
    pub direction: Direction,
    pub progress: f64,
    pub perpendicular_distance_m: f64,
    pub distance_along_m: f64,
    pub snapped_lat: f64,
    pub snapped_lon: f64,
}

struct Candidate {
    route_id: i64,
    direction: Direction,
    projection: geo::Projection,
    bearing: f64,
}

/// Projects a vehicle's raw fix onto the polylines of every route sharing
/// its reported route number, across both directions, and picks the best
/// fit. Returns `None` when nothing is within [`MAX_SNAP_DISTANCE_M`].
pub fn match_vehicle(
    raw: &RawVehicle,
    catalog: &RouteCatalog,
    max_snap_distance_m: f64,
) -> Option<MatchResult> {
    let candidate_routes = catalog.route_for_number(&raw.route_number);
    if candidate_routes.is_empty() {
        return None;
    }

    let mut candidates = Vec::new();
    for route in candidate_routes {
        for direction in [Direction::Forward, Direction::Reverse] {
            let resolved = route.direction(direction);
            if resolved.polyline.len() < 2 {
                continue;
            }
            if let Some(projection) = geo::project_point(
                &resolved.polyline,
                &resolved.cumulative_distance_m,
                raw.latitude,
                raw.longitude,
            ) {
                let bearing = geo::bearing_at_distance(
                    &resolved.polyline,
                    &resolved.cumulative_distance_m,
                    projection.distance_along_m,
                )
                .unwrap_or(0.0);
                candidates.push(Candidate {
                    route_id: route.id,
                    direction,
                    projection,
                    bearing,
                });
            }
        }
    }

    let min_perp = candidates
        .iter()
        .map(|candidate| candidate.projection.perpendicular_distance_m)
        .fold(f64::INFINITY, f64::min);
    if !min_perp.is_finite() || min_perp > max_snap_distance_m {
        return None;
    }

    let matched_route_id = candidates
        .iter()
        .min_by(|a, b| {
            a.projection
                .perpendicular_distance_m
                .partial_cmp(&b.projection.perpendicular_distance_m)
                .unwrap()
        })
        .map(|candidate| candidate.route_id)?;

    let same_route: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.route_id == matched_route_id)
        .collect();

    let min_angular_diff = same_route
        .iter()
        .map(|candidate| geo::angular_difference(raw.course_deg, candidate.bearing))
        .fold(f64::INFINITY, f64::min);

    let chosen = same_route
        .into_iter()
        .filter(|candidate| {
            geo::angular_difference(raw.course_deg, candidate.bearing) - min_angular_diff
                < BEARING_TIE_EPSILON_DEG
        })
        .min_by(|a, b| {
            a.projection
                .perpendicular_distance_m
                .partial_cmp(&b.projection.perpendicular_distance_m)
                .unwrap()
        })?;

    Some(MatchResult {
        route_id: chosen.route_id,
        direction: chosen.direction,
        progress: chosen.projection.progress,
        perpendicular_distance_m: chosen.projection.perpendicular_distance_m,
        distance_along_m: chosen.projection.distance_along_m,
        snapped_lat: chosen.projection.snapped_lat,
        snapped_lon: chosen.projection.snapped_lon,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use atlas::RouteCatalog;
    use chrono::Utc;
    use model::{diagnostics::RouteResolutionStats, ResolvedDirection, ResolvedRoute};

    use super::*;

    fn direction(polyline: Vec<(f64, f64)>) -> ResolvedDirection {
        let (cumulative_distance_m, length_m) = geo::cumulative_distance(&polyline);
        ResolvedDirection {
            polyline,
            cumulative_distance_m,
            length_m,
            stops: Vec::new(),
            has_osrm_geometry: true,
        }
    }

    fn route(id: i64, number: &str, forward: Vec<(f64, f64)>, reverse: Vec<(f64, f64)>) -> ResolvedRoute {
        ResolvedRoute {
            id,
            number: number.to_string(),
            name: format!("Route {number}"),
            color: None,
            forward: direction(forward),
            reverse: direction(reverse),
            unresolved_stop_ids: Vec::new(),
        }
    }

    fn catalog(routes: Vec<ResolvedRoute>) -> RouteCatalog {
        let mut by_id = HashMap::new();
        let mut resolution = HashMap::new();
        for route in routes {
            resolution.insert(route.id, RouteResolutionStats::default());
            by_id.insert(route.id, route);
        }
        RouteCatalog {
            routes: by_id,
            resolution,
            built_at: Utc::now(),
        }
    }

    fn vehicle(route_number: &str, latitude: f64, longitude: f64, course_deg: f64) -> RawVehicle {
        RawVehicle {
            device_id: "tram-1".into(),
            board_num: "101".into(),
            route_number: route_number.to_string(),
            latitude,
            longitude,
            speed_kmh: 20.0,
            course_deg,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn vehicle_beyond_max_snap_distance_is_unmatched() {
        let forward = vec![(50.0, 14.0), (50.0, 14.02)];
        let reverse = vec![(50.0, 14.02), (50.0, 14.0)];
        let catalog = catalog(vec![route(1, "1", forward, reverse)]);

        // roughly 1.1km north of the line, well beyond MAX_SNAP_DISTANCE_M
        let raw = vehicle("1", 50.01, 14.01, 90.0);

        assert!(match_vehicle(&raw, &catalog, MAX_SNAP_DISTANCE_M).is_none());
    }

    #[test]
    fn tied_bearing_is_broken_by_perpendicular_distance() {
        // Forward and reverse run in opposite directions on separate, parallel
        // tracks. A vehicle heading due north sits exactly between the two
        // bearings (90 and 270 degrees from north), so the bearing tie-break
        // falls through to whichever track it's physically closer to.
        let forward = vec![(50.0, 14.0), (50.0, 14.02)];
        let reverse = vec![(50.0005, 14.02), (50.0005, 14.0)];
        let catalog = catalog(vec![route(1, "1", forward, reverse)]);

        let raw = vehicle("1", 50.0002, 14.01, 0.0);

        let matched = match_vehicle(&raw, &catalog, MAX_SNAP_DISTANCE_M).expect("within snap distance");
        assert_eq!(matched.direction, Direction::Forward);
    }

    #[test]
    fn route_number_matches_but_no_direction_within_threshold_is_unmatched() {
        let far_line_a = vec![(51.0, 14.0), (51.0, 14.02)];
        let far_line_b = vec![(51.0, 14.02), (51.0, 14.0)];
        let catalog = catalog(vec![
            route(1, "1", far_line_a.clone(), far_line_b.clone()),
            route(2, "1", far_line_a, far_line_b),
        ]);

        let raw = vehicle("1", 50.0, 14.01, 90.0);

        assert!(match_vehicle(&raw, &catalog, MAX_SNAP_DISTANCE_M).is_none());
    }
}
