pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    // Convert latitude and longitude from degrees to radians
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    // Latitude bounds
    let min_lat = lat_rad - radius_km / EARTH_RADIUS_KM;
    let max_lat = lat_rad + radius_km / EARTH_RADIUS_KM;

    // Longitude bounds (adjusted by latitude)
    let min_lon = lon_rad - radius_km / (EARTH_RADIUS_KM * lat_rad.cos());
    let max_lon = lon_rad + radius_km / (EARTH_RADIUS_KM * lat_rad.cos());

    // Convert bounds back to degrees
    let min_lat_deg = to_degrees(min_lat);
    let max_lat_deg = to_degrees(max_lat);
    let min_lon_deg = to_degrees(min_lon);
    let max_lon_deg = to_degrees(max_lon);

    ((min_lat_deg, min_lon_deg), (max_lat_deg, max_lon_deg))
}

pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Flattens a (lat, lon) pair into local planar meters around `ref_lat`. Only
/// valid for distances small enough that curvature doesn't matter (city scale).
fn to_local_meters(ref_lat: f64, lat: f64, lon: f64) -> (f64, f64) {
    let x = lon * METERS_PER_DEGREE_LAT * to_radians(ref_lat).cos();
    let y = lat * METERS_PER_DEGREE_LAT;
    (x, y)
}

/// Cumulative arc length (meters) along a polyline, using the equirectangular
/// approximation anchored at the polyline's mean latitude. Returns the
/// per-vertex running total and the total length.
pub fn cumulative_distance(points: &[(f64, f64)]) -> (Vec<f64>, f64) {
    if points.is_empty() {
        return (Vec::new(), 0.0);
    }
    let ref_lat = points.iter().map(|(lat, _)| lat).sum::<f64>() / points.len() as f64;
    let mut cum = Vec::with_capacity(points.len());
    cum.push(0.0);
    let mut total = 0.0;
    for window in points.windows(2) {
        let (lat_a, lon_a) = window[0];
        let (lat_b, lon_b) = window[1];
        let (xa, ya) = to_local_meters(ref_lat, lat_a, lon_a);
        let (xb, yb) = to_local_meters(ref_lat, lat_b, lon_b);
        total += ((xb - xa).powi(2) + (yb - ya).powi(2)).sqrt();
        cum.push(total);
    }
    (cum, total)
}

pub struct Projection {
    pub progress: f64,
    pub perpendicular_distance_m: f64,
    pub snapped_lat: f64,
    pub snapped_lon: f64,
    pub distance_along_m: f64,
    pub segment_index: usize,
}

/// Projects `(lat, lon)` onto the closest point of the polyline described by
/// `points`/`cum` (as produced by [`cumulative_distance`]), clamping beyond
/// the endpoints to the nearest vertex.
pub fn project_point(points: &[(f64, f64)], cum: &[f64], lat: f64, lon: f64) -> Option<Projection> {
    if points.len() < 2 {
        return None;
    }
    let ref_lat = points.iter().map(|(lat, _)| lat).sum::<f64>() / points.len() as f64;
    let total = *cum.last().unwrap();
    let p = to_local_meters(ref_lat, lat, lon);

    let mut best: Option<(f64, f64, f64, usize, f64)> = None; // (perp_dist, t, seg_distance_along, idx, snapped_t_local)
    for (i, window) in points.windows(2).enumerate() {
        let (lat_a, lon_a) = window[0];
        let (lat_b, lon_b) = window[1];
        let a = to_local_meters(ref_lat, lat_a, lon_a);
        let b = to_local_meters(ref_lat, lat_b, lon_b);
        let seg_len_sq = (b.0 - a.0).powi(2) + (b.1 - a.1).powi(2);
        let t = if seg_len_sq > 0.0 {
            (((p.0 - a.0) * (b.0 - a.0) + (p.1 - a.1) * (b.1 - a.1)) / seg_len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let proj_x = a.0 + t * (b.0 - a.0);
        let proj_y = a.1 + t * (b.1 - a.1);
        let dist = ((p.0 - proj_x).powi(2) + (p.1 - proj_y).powi(2)).sqrt();
        let seg_len = seg_len_sq.sqrt();
        let distance_along = cum[i] + t * seg_len;

        if best.map(|(best_dist, ..)| dist < best_dist).unwrap_or(true) {
            best = Some((dist, t, distance_along, i, t));
        }
    }

    let (perp_dist, t, distance_along, idx, _) = best?;
    let (lat_a, lon_a) = points[idx];
    let (lat_b, lon_b) = points[idx + 1];
    let snapped_lat = lat_a + t * (lat_b - lat_a);
    let snapped_lon = lon_a + t * (lon_b - lon_a);

    Some(Projection {
        progress: if total > 0.0 { (distance_along / total).clamp(0.0, 1.0) } else { 0.0 },
        perpendicular_distance_m: perp_dist,
        snapped_lat,
        snapped_lon,
        distance_along_m: distance_along,
        segment_index: idx,
    })
}

/// Compass bearing in degrees (0 = north, clockwise) from point A to point B.
pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = to_radians(lat1);
    let lat2_rad = to_radians(lat2);
    let dlon_rad = to_radians(lon2 - lon1);

    let y = dlon_rad.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * dlon_rad.cos();
    let deg = to_degrees(y.atan2(x));
    (deg + 360.0) % 360.0
}

/// Bearing of the polyline segment a given distance-along falls into.
/// Distances beyond the ends extend the nearest segment's bearing.
pub fn bearing_at_distance(points: &[(f64, f64)], cum: &[f64], distance_m: f64) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let idx = match cum.binary_search_by(|d| d.partial_cmp(&distance_m).unwrap()) {
        Ok(i) => i.min(points.len() - 2),
        Err(i) => i.saturating_sub(1).min(points.len() - 2),
    };
    let (lat_a, lon_a) = points[idx];
    let (lat_b, lon_b) = points[idx + 1];
    Some(bearing(lat_a, lon_a, lat_b, lon_b))
}

/// Smallest absolute angular difference between two compass bearings, in [0, 180].
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_distance_is_monotone_and_matches_total() {
        let points = vec![(50.0, 14.0), (50.001, 14.0), (50.002, 14.001)];
        let (cum, total) = cumulative_distance(&points);
        assert_eq!(cum.len(), points.len());
        assert_eq!(cum[0], 0.0);
        for window in cum.windows(2) {
            assert!(window[1] >= window[0]);
        }
        assert!((cum.last().copied().unwrap() - total).abs() < 1e-6);
    }

    #[test]
    fn project_point_on_straight_segment_is_exact() {
        let points = vec![(50.0, 14.0), (50.0, 14.01)];
        let (cum, _) = cumulative_distance(&points);
        let midpoint_lon = (points[0].1 + points[1].1) / 2.0;
        let projection = project_point(&points, &cum, 50.0, midpoint_lon).unwrap();
        assert!((projection.progress - 0.5).abs() < 0.01);
        assert!(projection.perpendicular_distance_m < 1.0);
    }

    #[test]
    fn angular_difference_wraps_correctly() {
        assert!((angular_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((angular_difference(0.0, 180.0) - 180.0).abs() < 1e-9);
    }
}
