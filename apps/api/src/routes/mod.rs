pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        // Uploads carry whole documents; axum's default 2 MB body cap
        // would silently reject them. No explicit bound is enforced.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
