use utility::config::env_or_default;

use crate::matcher;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_snap_distance_m: f64,
    pub vehicle_ttl_seconds: i64,
    pub signal_lost_seconds: i64,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self {
            max_snap_distance_m: env_or_default(
                "MAX_SNAP_DISTANCE_M",
                matcher::MAX_SNAP_DISTANCE_M,
            ),
            vehicle_ttl_seconds: env_or_default("VEHICLE_TTL_SECONDS", 120),
            signal_lost_seconds: env_or_default("SIGNAL_LOST_SECONDS", 60),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_snap_distance_m: matcher::MAX_SNAP_DISTANCE_M,
            vehicle_ttl_seconds: 120,
            signal_lost_seconds: 60,
        }
    }
}
