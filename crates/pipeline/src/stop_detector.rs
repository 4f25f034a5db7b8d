use model::ResolvedStop;

/// Maximum number of upcoming stops reported per vehicle.
pub const MAX_NEXT_STOPS: usize = 5;

/// Locates the stop immediately behind `distance_along_m` (if any) and up to
/// [`MAX_NEXT_STOPS`] ahead, via binary search over stops pre-sorted by
/// distance along the route.
pub fn locate(stops: &[ResolvedStop], distance_along_m: f64) -> (Option<&ResolvedStop>, &[ResolvedStop]) {
    let passed = stops.partition_point(|resolved| resolved.distance_along_m <= distance_along_m);
    let prev_stop = if passed > 0 { Some(&stops[passed - 1]) } else { None };
    let next_end = (passed + MAX_NEXT_STOPS).min(stops.len());
    (prev_stop, &stops[passed..next_end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Stop;

    fn resolved(id: i64, distance_along_m: f64) -> ResolvedStop {
        ResolvedStop {
            stop: Stop {
                id,
                name: format!("stop-{id}"),
                latitude: 0.0,
                longitude: 0.0,
                direction: "forward".into(),
                is_live: true,
            },
            distance_along_m,
        }
    }

    #[test]
    fn finds_prev_and_capped_next_stops() {
        let stops: Vec<ResolvedStop> = (0..8).map(|i| resolved(i, i as f64 * 1000.0)).collect();
        let (prev, next) = locate(&stops, 2500.0);
        assert_eq!(prev.unwrap().stop.id, 2);
        assert_eq!(next.len(), MAX_NEXT_STOPS);
        assert_eq!(next[0].stop.id, 3);
    }

    #[test]
    fn before_first_stop_has_no_prev() {
        let stops: Vec<ResolvedStop> = (0..3).map(|i| resolved(i, i as f64 * 1000.0)).collect();
        let (prev, next) = locate(&stops, -10.0);
        assert!(prev.is_none());
        assert_eq!(next.len(), 3);
    }
}
