pub mod health;


use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::history::handlers as history;
use crate::state::AppState;

/// Upload ceiling for the generation routes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let generate: Router<AppState> = Router::new()
        .route("/api/generate", post(generation::handle_generate))
        .route("/api/generate/stream", post(generation::handle_generate_stream))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/api/health", get(health::health_handler))
        .merge(generate)
        // History API (signed-in users)
        .route("/api/history", get(history::handle_list_history))
        .route("/api/history/:id", delete(history::handle_delete_history))
        // Auth API
        .route("/api/auth/login", get(auth::handle_login))
        .route("/api/auth/callback", get(auth::handle_callback))
        .route("/api/auth/me", get(auth::handle_me))
        .route("/api/auth/logout", post(auth::handle_logout))
        .with_state(state)
}
