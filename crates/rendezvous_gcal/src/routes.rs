// --- File: crates/rendezvous_gcal/src/routes.rs ---
use crate::handlers::{get_availability_handler, GcalState};
use axum::{routing::get, Router};
use std::sync::Arc;

/// Availability routes, mounted under `/api` by the backend.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/availability", get(get_availability_handler))
        .route("/gcal/availability", get(get_availability_handler))
        .with_state(state)
}
