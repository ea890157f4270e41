pub mod rest;
pub mod sessions;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{evaluate_handler, generate_handler, prompt_handler};
pub use state::AppState;

/// Uploads may carry up to 25MB of attachments; leave room for multipart framing.
const MAX_BODY_BYTES: usize = 30 * 1024 * 1024;

/// Builds the API router. CORS and Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(rest::health_handler))
        .route("/options", get(rest::options_handler))
        .route("/emails/prompt", post(rest::prompt_handler))
        .route("/emails/generate", post(rest::generate_handler))
        .route("/emails/evaluate", post(rest::evaluate_handler))
        .route("/sessions", post(sessions::create_session_handler))
        .route("/sessions/{id}", delete(sessions::delete_session_handler))
        .route(
            "/sessions/{id}/attachments",
            get(sessions::list_attachments_handler).post(sessions::add_attachments_handler),
        )
        .route(
            "/sessions/{id}/attachments/{name}",
            delete(sessions::remove_attachment_handler),
        )
        .route("/sessions/{id}/send", post(sessions::send_email_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}
