use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: String,

    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_seconds: u64,

    // Media settings - local blob store for profile images
    #[serde(default = "default_media_root")]
    pub media_root: String,

    #[serde(default = "default_media_max_bytes")]
    pub media_max_bytes: usize,
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_expiry() -> u64 {
    86400 // 24 hours
}

fn default_media_root() -> String {
    "./uploads".to_string()
}

fn default_media_max_bytes() -> usize {
    2 * 1024 * 1024 // 2MB per image
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }
}
