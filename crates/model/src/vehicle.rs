use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::Direction;

/// A vehicle fix as reported by the source API, before any enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVehicle {
    pub device_id: String,
    pub board_num: String,
    pub route_number: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    pub course_deg: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRef {
    pub id: i64,
    pub name: String,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextStop {
    pub id: i64,
    pub name: String,
    pub eta_seconds: Option<f64>,
}

/// The enriched state of a vehicle as held by the vehicle tracker and served
/// to subscribers and the query API. Exists from the vehicle's first
/// observation until it drops out of the source feed for longer than the
/// configured time-to-live.
///
/// Serialized shape is bit-exact: `{id, board_num, route, route_id, lat, lon,
/// speed, course, prev_stop, next_stops, progress, timestamp, signal_lost}`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    pub id: String,
    pub board_num: String,
    pub route: String,
    pub route_id: Option<i64>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "speed")]
    pub speed_kmh: f64,
    #[serde(rename = "course")]
    pub course_deg: f64,
    #[serde(skip_serializing)]
    pub direction: Option<Direction>,
    pub progress: Option<f64>,
    #[serde(skip_serializing)]
    pub distance_along_m: Option<f64>,
    pub prev_stop: Option<StopRef>,
    pub next_stops: Vec<NextStop>,
    pub timestamp: DateTime<Utc>,
    pub signal_lost: bool,
}

impl VehicleState {
    pub fn is_matched(&self) -> bool {
        self.route_id.is_some()
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl_seconds: i64) -> bool {
        (now - self.timestamp).num_seconds() > ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(timestamp: DateTime<Utc>) -> VehicleState {
        VehicleState {
            id: "1".into(),
            board_num: "101".into(),
            route: "1".into(),
            route_id: None,
            latitude: 0.0,
            longitude: 0.0,
            speed_kmh: 0.0,
            course_deg: 0.0,
            direction: None,
            progress: None,
            distance_along_m: None,
            prev_stop: None,
            next_stops: Vec::new(),
            timestamp,
            signal_lost: false,
        }
    }

    #[test]
    fn is_stale_respects_ttl() {
        let now = Utc::now();
        let fresh = sample(now - Duration::seconds(10));
        let stale = sample(now - Duration::seconds(200));
        assert!(!fresh.is_stale(now, 120));
        assert!(stale.is_stale(now, 120));
    }
}
