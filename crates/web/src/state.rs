use std::sync::Arc;

use actors::actor_ref::ActorRef;
use atlas::RouteIndex;
use axum::extract::FromRef;
use broadcast::Broadcaster;
use pipeline::VehicleTracker;

#[derive(Clone, FromRef)]
pub struct WebState {
    pub route_index: Arc<RouteIndex>,
    pub tracker: ActorRef<VehicleTracker>,
    pub broadcaster: Arc<Broadcaster>,
}
