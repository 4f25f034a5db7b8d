use model::VehicleState;
use serde::Serialize;

/// A message sent down the `/ws/vehicles` subscription. A `Snapshot` is
/// sent once per subscription, immediately after it opens; every tick after
/// that produces an `Update` containing only vehicles observed that tick.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    Snapshot { vehicles: Vec<VehicleState> },
    Update { vehicles: Vec<VehicleState> },
}
