use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::SqliteConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};

/// Connect with the default pool settings.
///
/// ```ignore
/// let db = database::sqlite::connect("sqlite://database.db?mode=rwc").await?;
/// ```
pub async fn connect(database_url: &str) -> DatabaseResult<DatabaseConnection> {
    connect_from_config(SqliteConfig::new(database_url)).await
}

pub async fn connect_from_config(config: SqliteConfig) -> DatabaseResult<DatabaseConnection> {
    let url = config.url.clone();
    let db = Database::connect(config.into_connect_options()).await?;
    info!(url = %url, "Connected to SQLite database");
    Ok(db)
}

/// Connect, retrying with exponential backoff while the file is unavailable
/// (locked volume, slow mount at container start).
pub async fn connect_with_retry(
    config: SqliteConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<DatabaseConnection> {
    let retry_config = retry_config.unwrap_or_default();
    let attempts = retry_config.max_retries + 1;

    retry_with_backoff(|| connect_from_config(config.clone()), retry_config)
        .await
        .map_err(|e| {
            DatabaseError::ConnectionFailed(format!("{} after {} attempts", e, attempts))
        })
}

/// Apply every pending migration of `M`.
///
/// ```ignore
/// use migration::Migrator;
///
/// database::sqlite::run_migrations::<Migrator>(&db, "telemetry_api").await?;
/// ```
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!(app = app_name, "Running database migrations");
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!(app = app_name, "Migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::Migrator;
    use sea_orm::ConnectionTrait;

    fn file_url(dir: &tempfile::TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display())
    }

    #[tokio::test]
    async fn test_connect_creates_file_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect(&file_url(&dir)).await.unwrap();

        run_migrations::<Migrator>(&db, "test").await.unwrap();
        // Second run is a no-op
        run_migrations::<Migrator>(&db, "test").await.unwrap();

        db.execute_unprepared("SELECT id FROM sessions LIMIT 1")
            .await
            .unwrap();
        db.execute_unprepared("SELECT id, category, name, data, timestamp, session_id FROM events LIMIT 1")
            .await
            .unwrap();
        assert!(dir.path().join("test.db").exists());
    }

    #[tokio::test]
    async fn test_connect_with_retry_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        // Read-only mode never creates the file
        let url = format!(
            "sqlite://{}?mode=ro",
            dir.path().join("missing.db").display()
        );
        let retry = RetryConfig::new()
            .with_max_retries(1)
            .with_initial_delay(1)
            .without_jitter();

        let err = connect_with_retry(SqliteConfig::new(url), Some(retry))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(ref msg) if msg.contains("2 attempts")));
    }
}
