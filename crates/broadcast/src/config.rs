use utility::config::env_or_default;

#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    pub max_buffered_frames: usize,
    pub snapshot_max_age_ms: i64,
}

impl BroadcastConfig {
    pub fn from_env() -> Self {
        Self {
            max_buffered_frames: env_or_default("MAX_BUFFERED_FRAMES", 8),
            snapshot_max_age_ms: env_or_default("SNAPSHOT_MAX_AGE_MS", 20_000),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            max_buffered_frames: 8,
            snapshot_max_age_ms: 20_000,
        }
    }
}
