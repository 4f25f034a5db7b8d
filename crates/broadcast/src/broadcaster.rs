use std::sync::Mutex;

use chrono::{DateTime, Utc};
use model::VehicleState;
use tokio::sync::broadcast;

use crate::{config::BroadcastConfig, frame::Frame};

/// Publishes tick updates to every subscriber over a bounded, drop-oldest
/// channel. A slow subscriber lagging behind the buffer depth loses its
/// oldest unread frames rather than stalling the publisher — exactly the
/// semantics `tokio::sync::broadcast` already provides.
pub struct Broadcaster {
    sender: broadcast::Sender<Frame>,
    last_tick_at: Mutex<Option<DateTime<Utc>>>,
    max_age_ms: i64,
}

impl Broadcaster {
    pub fn new(config: &BroadcastConfig) -> Self {
        let (sender, _) = broadcast::channel(config.max_buffered_frames.max(1));
        Self {
            sender,
            last_tick_at: Mutex::new(None),
            max_age_ms: config.snapshot_max_age_ms,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Frame> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes the vehicles observed in the most recent tick. Ignores the
    /// "no active subscribers" error — publishing is fire-and-forget.
    pub fn publish_update(&self, vehicles: Vec<VehicleState>, tick_at: DateTime<Utc>) {
        *self.last_tick_at.lock().expect("broadcaster lock poisoned") = Some(tick_at);
        let _ = self.sender.send(Frame::Update { vehicles });
    }

    /// Builds the snapshot sent to a freshly opened subscription. When the
    /// most recent tick is older than `SNAPSHOT_MAX_AGE_MS`, every vehicle
    /// in the snapshot is marked `signal_lost` rather than withholding the
    /// snapshot outright, so new clients always get an immediate frame.
    pub fn snapshot(&self, vehicles: Vec<VehicleState>, now: DateTime<Utc>) -> Frame {
        let last_tick_at = *self.last_tick_at.lock().expect("broadcaster lock poisoned");
        let stale = match last_tick_at {
            Some(tick_at) => (now - tick_at).num_milliseconds() > self.max_age_ms,
            None => true,
        };
        let vehicles = if stale {
            vehicles
                .into_iter()
                .map(|mut vehicle| {
                    vehicle.signal_lost = true;
                    vehicle
                })
                .collect()
        } else {
            vehicles
        };
        Frame::Snapshot { vehicles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn vehicle() -> VehicleState {
        VehicleState {
            id: "1".into(),
            board_num: "1".into(),
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
            timestamp: Utc::now(),
            signal_lost: false,
        }
    }

    #[test]
    fn marks_stale_snapshot_as_signal_lost() {
        let broadcaster = Broadcaster::new(&BroadcastConfig {
            max_buffered_frames: 8,
            snapshot_max_age_ms: 1000,
        });
        let now = Utc::now();
        broadcaster.publish_update(vec![], now - Duration::seconds(30));

        let Frame::Snapshot { vehicles } = broadcaster.snapshot(vec![vehicle()], now) else {
            panic!("expected a snapshot frame");
        };
        assert!(vehicles[0].signal_lost);
    }

    #[test]
    fn fresh_snapshot_is_untouched() {
        let broadcaster = Broadcaster::new(&BroadcastConfig {
            max_buffered_frames: 8,
            snapshot_max_age_ms: 20_000,
        });
        let now = Utc::now();
        broadcaster.publish_update(vec![], now);

        let Frame::Snapshot { vehicles } = broadcaster.snapshot(vec![vehicle()], now) else {
            panic!("expected a snapshot frame");
        };
        assert!(!vehicles[0].signal_lost);
    }
}
