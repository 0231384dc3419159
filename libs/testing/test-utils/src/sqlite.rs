//! SQLite test infrastructure
//!
//! Every `TestDatabase` is a fresh file in its own temporary directory, so
//! tests are isolated and can run in parallel. A file is used instead of
//! `sqlite::memory:` because an in-memory database is private to a single
//! pooled connection.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::PathBuf;
use tempfile::TempDir;

/// Migrated database removed together with its directory on drop.
pub struct TestDatabase {
    _dir: TempDir,
    pub connection: DatabaseConnection,
    pub connection_string: String,
    pub path: PathBuf,
}

impl TestDatabase {
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let store = db.connection();
    /// # }
    /// ```
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir for test database");
        let path = dir.path().join("telemetry-test.db");
        let connection_string = format!("sqlite://{}?mode=rwc", path.display());

        let mut options = ConnectOptions::new(&connection_string);
        options.max_connections(5).sqlx_logging(false);

        let connection = Database::connect(options)
            .await
            .expect("Failed to open test database");

        Migrator::up(&connection, None)
            .await
            .expect("Failed to run migrations on test database");

        tracing::debug!(path = %path.display(), "Test database ready");

        Self {
            _dir: dir,
            connection,
            connection_string,
            path,
        }
    }

    /// A clone of the pooled connection handle.
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
