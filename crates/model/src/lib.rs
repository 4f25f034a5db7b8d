pub mod diagnostics;
pub mod route;
pub mod stop;
pub mod vehicle;

pub use diagnostics::Diagnostics;
pub use route::{Direction, ResolvedDirection, ResolvedRoute, ResolvedStop, Route};
pub use stop::Stop;
pub use vehicle::{NextStop, RawVehicle, StopRef, VehicleState};
