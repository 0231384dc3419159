use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod health;

/// Event routes with state applied, mounted at the root by `create_router`.
pub fn routes(state: &AppState) -> Router {
    domain_events::events_router(state.events())
}

/// `/ready` with a real database check. Merged next to the stateless app router.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
