use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub zoom: ZoomSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
    /// Reported to the server in the connection handshake.
    pub app_name: String,
    pub server_selection_timeout_secs: u64,
}

/// Verification settings for access tokens minted by the external auth provider.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub access_token_ttl_secs: u64,
}

/// Server-to-server OAuth app used to read meeting reports.
#[derive(Debug, Deserialize, Clone)]
pub struct ZoomSettings {
    pub account_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub oauth_url: String,
    pub request_timeout_secs: u64,
    pub page_size: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("COHORT"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "cohort")?
            .set_default("database.app_name", "cohort-attendance")?
            .set_default("database.server_selection_timeout_secs", 10)?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.issuer", "cohort")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("zoom.account_id", "")?
            .set_default("zoom.client_id", "")?
            .set_default("zoom.client_secret", "")?
            .set_default("zoom.api_base_url", "https://api.zoom.us/v2")?
            .set_default("zoom.oauth_url", "https://zoom.us/oauth/token")?
            .set_default("zoom.request_timeout_secs", 30)?
            .set_default("zoom.page_size", 300)?
            .build()?;

        config.try_deserialize()
    }
}
