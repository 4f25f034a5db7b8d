use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolution outcome for a single route, recorded when the route atlas is
/// rebuilt. Surfaced through the diagnostics endpoint so resolution gaps in
/// the upstream data are visible without reading logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResolutionStats {
    pub unresolved_stop_ids: Vec<i64>,
    pub unnamed_stop_count: u32,
    pub forward_has_osrm_geometry: bool,
    pub reverse_has_osrm_geometry: bool,
    /// Stop IDs whose projected `distance_along_m` was lower than the
    /// previous stop's, in path order. Signals a data-quality issue in the
    /// upstream stop ordering or positions, not a geometry fault.
    pub out_of_order_stop_ids: Vec<i64>,
}

/// Process-wide counters updated by the vehicle tracker on every tick and by
/// the scheduler on every route refresh. This is the same data the
/// observability log lines report, just queryable instead of grep-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub ticks_processed: u64,
    pub vehicles_matched: u64,
    pub vehicles_unmatched: u64,
    pub matched_by_route: HashMap<String, u64>,
    pub route_refreshes: u64,
    pub route_refresh_failures: u64,
    pub route_resolution: HashMap<i64, RouteResolutionStats>,
    pub last_tick_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_route_refresh_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Diagnostics {
    pub fn record_match(&mut self, route_number: &str, matched: bool) {
        if matched {
            self.vehicles_matched += 1;
            *self.matched_by_route.entry(route_number.to_string()).or_insert(0) += 1;
        } else {
            self.vehicles_unmatched += 1;
        }
    }
}
