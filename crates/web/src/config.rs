/// Process-wide configuration. `database_url`/`redis_url` are read and kept
/// here purely because they're part of the documented environment surface
/// — nothing in this crate connects to either; a deployment wrapper around
/// this process is expected to use them.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_addr: String,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            redis_url: std::env::var("REDIS_URL").ok(),
        }
    }
}
