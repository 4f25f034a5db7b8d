#[derive(Debug, Clone)]
pub struct AtlasConfig {
    pub osrm_base_url: String,
}

impl AtlasConfig {
    pub fn from_env() -> Self {
        Self {
            osrm_base_url: std::env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| "https://router.project-osrm.org".to_string()),
        }
    }
}
