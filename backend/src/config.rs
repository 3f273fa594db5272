use tracing::debug;

// The database URL for the production database
const DEFAULT_DATABASE_URL: &str = "sqlite:gigledger.db";

/// Runtime configuration sourced from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        debug!(database_url = %database_url, "configuration resolved");
        Self { database_url }
    }
}
