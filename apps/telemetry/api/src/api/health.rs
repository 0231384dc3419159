//! Readiness backed by the SQLite pool.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let database: HealthCheckFuture<'_> = Box::pin(async {
        database::sqlite::check_health(&state.db)
            .await
            .map_err(|e| format!("Database ping failed: {}", e))
    });

    let mut checks = vec![("database", database)];

    if let Some(queue) = &state.queue {
        let ingest: HealthCheckFuture<'_> = Box::pin(async move {
            if queue.is_closed() {
                Err("Ingest queue is closed".to_string())
            } else {
                Ok(())
            }
        });
        checks.push(("ingest_queue", ingest));
    }

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
