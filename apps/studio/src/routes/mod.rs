pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dashboard::handlers;
use crate::proxy::proxy_routes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Provider proxies (carry their own CORS policy)
        .merge(proxy_routes(&state.config))
        // Dashboard
        .route("/", get(handlers::handle_root))
        .route("/dashboard", get(handlers::handle_dashboard))
        .route("/dashboard/create", post(handlers::handle_create))
        .route("/dashboard/settings", post(handlers::handle_save_settings))
        .route("/dashboard/tasks/:id", get(handlers::handle_task_status))
        .route("/api/studio/generate", post(handlers::handle_generate))
        .with_state(state)
}
