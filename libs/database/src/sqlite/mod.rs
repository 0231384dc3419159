//! SQLite connector and utilities
//!
//! Connection pooling, startup retry, migrations and health checks for the
//! single-file store backing the telemetry service.

mod config;
mod connector;
mod health;

pub use config::{SqliteConfig, DEFAULT_DATABASE_URL};
pub use connector::{connect, connect_from_config, connect_with_retry, run_migrations};
pub use health::{check_health, check_health_detailed, HealthStatus};

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
