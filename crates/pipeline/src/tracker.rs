use std::{any::Any, collections::HashMap, sync::Arc};

use actors::{
    actor::{Actor, SupervisionStrategy},
    handler::{Handler, Message},
};
use async_trait::async_trait;
use atlas::RouteCatalog;
use chrono::{DateTime, Utc};
use model::{diagnostics::Diagnostics, Direction, NextStop, RawVehicle, StopRef, VehicleState};

use crate::{config::PipelineConfig, eta, matcher, stop_detector};

/// Orchestrates route matching, stop detection, and ETA calculation for a
/// batch of raw fixes, and owns the resulting state table. The scheduler's
/// fast loop is the only caller of [`Tick`]; [`GetSnapshot`]/[`GetVehicle`]/
/// [`GetDiagnostics`] serve reads from the query API and broadcaster.
pub struct VehicleTracker {
    config: PipelineConfig,
    states: HashMap<String, VehicleState>,
    diagnostics: Diagnostics,
}

impl VehicleTracker {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            states: HashMap::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    fn enrich(&self, raw: &RawVehicle, catalog: &RouteCatalog, now: DateTime<Utc>) -> VehicleState {
        let matched = matcher::match_vehicle(raw, catalog, self.config.max_snap_distance_m);

        let (route_id, direction, progress, distance_along_m, lat, lon, prev_stop, next_stops) =
            match matched.as_ref().and_then(|m| catalog.routes.get(&m.route_id).map(|r| (m, r))) {
                Some((matched, route)) => {
                    let resolved_direction = route.direction(matched.direction);
                    let (prev, next_slice) =
                        stop_detector::locate(&resolved_direction.stops, matched.distance_along_m);
                    let prev_stop = prev.map(|resolved| StopRef {
                        id: resolved.stop.id,
                        name: resolved.stop.name.clone(),
                    });
                    let next_stops = next_slice
                        .iter()
                        .map(|resolved| {
                            let remaining_m = resolved.distance_along_m - matched.distance_along_m;
                            NextStop {
                                id: resolved.stop.id,
                                name: resolved.stop.name.clone(),
                                eta_seconds: eta::compute_eta(remaining_m, raw.speed_kmh),
                            }
                        })
                        .collect();
                    (
                        Some(matched.route_id),
                        Some(matched.direction),
                        Some(matched.progress),
                        Some(matched.distance_along_m),
                        matched.snapped_lat,
                        matched.snapped_lon,
                        prev_stop,
                        next_stops,
                    )
                }
                None => (
                    None,
                    None::<Direction>,
                    None,
                    None,
                    raw.latitude,
                    raw.longitude,
                    None,
                    Vec::new(),
                ),
            };

        VehicleState {
            id: raw.device_id.clone(),
            board_num: raw.board_num.clone(),
            route: raw.route_number.clone(),
            route_id,
            latitude: lat,
            longitude: lon,
            speed_kmh: raw.speed_kmh,
            course_deg: raw.course_deg,
            direction,
            progress,
            distance_along_m,
            prev_stop,
            next_stops,
            timestamp: raw.timestamp,
            signal_lost: (now - raw.timestamp).num_seconds() > self.config.signal_lost_seconds,
        }
    }

    fn evict_stale(&mut self, now: DateTime<Utc>) {
        let ttl = self.config.vehicle_ttl_seconds;
        self.states.retain(|_, state| !state.is_stale(now, ttl));
    }
}

impl Actor for VehicleTracker {
    fn on_fail(&mut self, _error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

#[derive(Clone)]
pub struct Tick {
    pub vehicles: Arc<Vec<RawVehicle>>,
    pub catalog: Arc<RouteCatalog>,
}

impl Message for Tick {
    type Response = Vec<VehicleState>;
}

#[async_trait]
impl Handler<Tick> for VehicleTracker {
    async fn handle(&mut self, message: Tick) -> Vec<VehicleState> {
        let now = Utc::now();
        let mut updated = Vec::with_capacity(message.vehicles.len());

        for raw in message.vehicles.iter() {
            let state = self.enrich(raw, &message.catalog, now);
            self.diagnostics
                .record_match(&raw.route_number, state.is_matched());
            self.states.insert(state.id.clone(), state.clone());
            updated.push(state);
        }

        self.evict_stale(now);
        self.diagnostics.ticks_processed += 1;
        self.diagnostics.last_tick_at = Some(now);

        updated
    }
}

#[derive(Clone)]
pub struct GetSnapshot;

impl Message for GetSnapshot {
    type Response = Vec<VehicleState>;
}

#[async_trait]
impl Handler<GetSnapshot> for VehicleTracker {
    async fn handle(&mut self, _message: GetSnapshot) -> Vec<VehicleState> {
        self.states.values().cloned().collect()
    }
}

#[derive(Clone)]
pub struct GetVehicle(pub String);

impl Message for GetVehicle {
    type Response = Option<VehicleState>;
}

#[async_trait]
impl Handler<GetVehicle> for VehicleTracker {
    async fn handle(&mut self, message: GetVehicle) -> Option<VehicleState> {
        self.states.get(&message.0).cloned()
    }
}

#[derive(Clone)]
pub struct GetDiagnostics;

impl Message for GetDiagnostics {
    type Response = Diagnostics;
}

#[async_trait]
impl Handler<GetDiagnostics> for VehicleTracker {
    async fn handle(&mut self, _message: GetDiagnostics) -> Diagnostics {
        self.diagnostics.clone()
    }
}
