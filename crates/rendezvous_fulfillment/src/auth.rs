use crate::handlers::FulfillmentState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use rendezvous_common::{config_error, RendezvousError};
use std::sync::Arc;
use tracing::{debug, warn};

pub const INTERNAL_AUTH_HEADER: &str = "X-Internal-Auth-Secret";

/// Lets a request through only when it carries the shared fulfillment secret.
pub async fn fulfillment_auth_middleware(
    State(state): State<Arc<FulfillmentState>>,
    req: Request,
    next: Next,
) -> Response {
    let expected = match state
        .config
        .fulfillment
        .as_ref()
        .and_then(|f| f.shared_secret.as_deref())
        .filter(|secret| !secret.is_empty())
    {
        Some(secret) => secret.to_string(),
        None => {
            warn!("Fulfillment shared secret is not configured");
            return config_error("fulfillment authentication is not configured").into_response();
        }
    };

    let provided = req
        .headers()
        .get(INTERNAL_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(secret) if constant_time_eq(secret.as_bytes(), expected.as_bytes()) => {
            debug!("Fulfillment request authenticated");
            next.run(req).await
        }
        Some(_) => {
            warn!("Fulfillment request with an invalid secret");
            RendezvousError::AuthError("Invalid credentials.".to_string()).into_response()
        }
        None => {
            warn!(header = INTERNAL_AUTH_HEADER, "Fulfillment request without secret");
            RendezvousError::AuthError(format!("Missing {} header.", INTERNAL_AUTH_HEADER))
                .into_response()
        }
    }
}
