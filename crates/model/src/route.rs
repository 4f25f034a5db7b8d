use serde::{Deserialize, Serialize};

use crate::stop::Stop;

/// Forward (0) or reverse (1) traversal of a route's stop sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward = 0,
    Reverse = 1,
}

impl Direction {
    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::Forward),
            1 => Some(Direction::Reverse),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// A route as published upstream: an identity plus, for each direction, the
/// ordered stop IDs that make up its path. IDs that don't resolve against
/// the points catalog are dropped during resolution, not here.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: i64,
    pub number: String,
    pub name: String,
    pub color: Option<String>,
    pub forward_path: Vec<i64>,
    pub reverse_path: Vec<i64>,
}

impl Route {
    pub fn path(&self, direction: Direction) -> &[i64] {
        match direction {
            Direction::Forward => &self.forward_path,
            Direction::Reverse => &self.reverse_path,
        }
    }
}

/// A stop placed along a resolved direction's polyline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStop {
    pub stop: Stop,
    pub distance_along_m: f64,
}

/// One direction of a route after resolution: stops placed along a polyline
/// with a cumulative arc-length table. Built by the route resolver and
/// geometry fetcher, owned by the route index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDirection {
    pub polyline: Vec<(f64, f64)>,
    pub cumulative_distance_m: Vec<f64>,
    pub length_m: f64,
    pub stops: Vec<ResolvedStop>,
    pub has_osrm_geometry: bool,
}

impl ResolvedDirection {
    pub fn stop_distance(&self, stop_id: i64) -> Option<f64> {
        self.stops
            .iter()
            .find(|resolved| resolved.stop.id == stop_id)
            .map(|resolved| resolved.distance_along_m)
    }
}

/// A route with both directions resolved to geometry. This is the unit the
/// route index publishes and the query API serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRoute {
    pub id: i64,
    pub number: String,
    pub name: String,
    pub color: Option<String>,
    pub forward: ResolvedDirection,
    pub reverse: ResolvedDirection,
    pub unresolved_stop_ids: Vec<i64>,
}

impl ResolvedRoute {
    pub fn direction(&self, direction: Direction) -> &ResolvedDirection {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }
}
