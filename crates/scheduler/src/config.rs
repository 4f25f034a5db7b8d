use std::time::Duration;

use utility::config::env_or_default;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub poll_interval_seconds: u64,
    pub route_refresh_hours: u64,
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            poll_interval_seconds: env_or_default("POLL_INTERVAL_SECONDS", 10),
            route_refresh_hours: env_or_default("ROUTE_REFRESH_HOURS", 6),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn route_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.route_refresh_hours * 3600)
    }
}
