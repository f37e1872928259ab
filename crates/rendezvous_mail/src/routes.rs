use crate::handlers::{contact_handler, MailState};
use axum::{routing::post, Router};
use std::sync::Arc;

/// Mail routes, mounted under `/api` by the backend.
pub fn routes(state: Arc<MailState>) -> Router {
    Router::new()
        .route("/contact", post(contact_handler))
        .with_state(state)
}
