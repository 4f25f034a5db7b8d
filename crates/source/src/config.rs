/// Connection details for the upstream transit API. Mirrors
/// `database::DatabaseConnectionInfo::from_env` in spirit: one struct per
/// crate, loaded once at startup, cloned cheaply into tasks that need it.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub api_key: String,
}

impl SourceConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ETTU_BASE_URL")
                .unwrap_or_else(|_| "https://map.ettu.ru".to_string()),
            api_key: std::env::var("ETTU_API_KEY").unwrap_or_default(),
        }
    }
}
