pub mod health;

use axum::{routing::get, Router};

use crate::runs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/optimize",
            get(handlers::handle_list_runs).post(handlers::handle_start_optimization),
        )
        .route("/api/v1/optimize/:id", get(handlers::handle_get_run))
        .with_state(state)
}
