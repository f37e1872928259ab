use crate::handlers::{
    create_payment_session_handler, stripe_webhook_handler, verify_payment_handler, StripeState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Payment routes, mounted under `/api` by the backend.
pub fn routes(state: Arc<StripeState>) -> Router {
    Router::new()
        .route(
            "/create-payment-session",
            post(create_payment_session_handler),
        )
        .route("/verify-payment/{session_id}", get(verify_payment_handler))
        .route("/stripe/webhook", post(stripe_webhook_handler))
        .with_state(state)
}
