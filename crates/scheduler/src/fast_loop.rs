use std::{sync::Arc, time::Duration};

use actors::actor_ref::ActorRef;
use async_trait::async_trait;
use atlas::RouteIndex;
use broadcast::Broadcaster;
use chrono::Utc;
use pipeline::{Tick, VehicleTracker};
use source::SourceClient;

use crate::job::{Continuation, Job};

/// Fetches vehicles and runs them through the tracker every tick, then
/// publishes the result. Errors from the source are already retried inside
/// [`SourceClient`]; a tick that still fails just logs and keeps the
/// previous state, per the normal cadence.
pub struct FastLoop {
    source: Arc<SourceClient>,
    route_index: Arc<RouteIndex>,
    tracker: ActorRef<VehicleTracker>,
    broadcaster: Arc<Broadcaster>,
    interval: Duration,
}

impl FastLoop {
    pub fn new(
        source: Arc<SourceClient>,
        route_index: Arc<RouteIndex>,
        tracker: ActorRef<VehicleTracker>,
        broadcaster: Arc<Broadcaster>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            route_index,
            tracker,
            broadcaster,
            interval,
        }
    }
}

#[async_trait]
impl Job for FastLoop {
    async fn tick(&mut self) -> Continuation {
        match self.source.fetch_vehicles().await {
            Ok(vehicles) => {
                let catalog = self.route_index.snapshot();
                let tick = Tick {
                    vehicles: Arc::new(vehicles),
                    catalog,
                };
                match self.tracker.ask(tick).await {
                    Ok(updated) => {
                        self.broadcaster.publish_update(updated, Utc::now());
                    }
                    Err(err) => {
                        tracing::error!(?err, "vehicle tracker did not respond to tick");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(%err, "fast loop could not fetch vehicles this tick");
            }
        }
        Continuation::Continue
    }

    fn interval(&self) -> Duration {
        self.interval
    }
}
