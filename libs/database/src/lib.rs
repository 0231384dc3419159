//! Database library providing the SQLite connector and shared utilities
//!
//! The telemetry service stores sessions and events in a single-file SQLite
//! database accessed through SeaORM. This crate owns connection setup,
//! retry on startup, migration running and health checks.
//!
//! # Features
//!
//! - `sqlite` (default) - SQLite support with SeaORM
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::sqlite;
//! use migration::Migrator;
//!
//! let db = sqlite::connect("sqlite://database.db?mode=rwc").await?;
//! sqlite::run_migrations::<Migrator>(&db, "telemetry_api").await?;
//! ```

pub mod common;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use common::{DatabaseError, DatabaseResult};
