use crate::auth::fulfillment_auth_middleware;
use crate::handlers::{book_handler, fulfill_booking_handler, FulfillmentState};
use axum::{middleware, routing::post, Router};
use std::sync::Arc;

/// Booking routes, mounted under `/api` by the backend.
///
/// `/fulfill/*` routes require the internal auth secret.
pub fn routes(state: Arc<FulfillmentState>) -> Router {
    let internal = Router::new()
        .route("/fulfill/booking", post(fulfill_booking_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            fulfillment_auth_middleware,
        ));

    Router::new()
        .route("/book", post(book_handler))
        .merge(internal)
        .with_state(state)
}
