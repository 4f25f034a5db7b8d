/// Speed floor used so a stopped or crawling tram still produces a usable
/// estimate instead of one approaching infinity.
pub const MIN_SPEED_KMH: f64 = 5.0;

/// Estimates beyond this horizon, in seconds, are reported as unknown.
pub const MAX_HORIZON_SECONDS: f64 = 3600.0;

/// Linear time estimate to cover `remaining_m` at `speed_kmh`, floored and
/// capped per [`MIN_SPEED_KMH`] and [`MAX_HORIZON_SECONDS`].
pub fn compute_eta(remaining_m: f64, speed_kmh: f64) -> Option<f64> {
    let remaining_m = remaining_m.max(0.0);
    let effective_speed_ms = speed_kmh.max(MIN_SPEED_KMH) / 3.6;
    let eta_seconds = remaining_m / effective_speed_ms;
    if eta_seconds > MAX_HORIZON_SECONDS {
        None
    } else {
        Some(eta_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_vehicle_uses_speed_floor() {
        let eta = compute_eta(1000.0, 0.0).unwrap();
        assert!((eta - 720.0).abs() < 1e-6);
    }

    #[test]
    fn beyond_horizon_is_unknown() {
        assert!(compute_eta(5_000_000.0, 30.0).is_none());
    }

    #[test]
    fn negative_remaining_is_clamped() {
        let eta = compute_eta(-50.0, 36.0).unwrap();
        assert_eq!(eta, 0.0);
    }
}
