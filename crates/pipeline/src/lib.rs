pub mod config;
pub mod eta;
pub mod matcher;
pub mod stop_detector;
pub mod tracker;

pub use config::PipelineConfig;
pub use tracker::{GetDiagnostics, GetSnapshot, GetVehicle, Tick, VehicleTracker};
