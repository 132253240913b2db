use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Chat
        .route("/chat/messages", post(handlers::send_message))
        .route("/chat/turns", get(handlers::get_turns))
        .route("/chat/notices", get(handlers::get_notices))
        // Recording control
        .route("/recording/start", post(handlers::start_recording))
        .route("/recording/stop", post(handlers::stop_recording))
        .route("/recording/cancel", post(handlers::cancel_recording))
        .route("/recording/state", get(handlers::get_state))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
