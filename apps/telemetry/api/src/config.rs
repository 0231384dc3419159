use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::sqlite::SqliteConfig;
use domain_events::IngestConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: SqliteConfig,
    pub ingest: IngestConfig,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = SqliteConfig::from_env()?; // DATABASE_URL falls back to ./database.db
        let ingest = IngestConfig::from_env()?;
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080

        Ok(Self {
            app: app_info!(),
            database,
            ingest,
            server,
            environment,
        })
    }
}
