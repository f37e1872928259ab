use crate::logic::{BookingResponse, Fulfiller, ReservationCommit, PAYMENT_STATUS_PAID};
use axum::{extract::State, response::Json};
use rendezvous_booking::{ClientDetails, TimeSlot};
use rendezvous_common::{unavailable, validation_error, RendezvousError};
use rendezvous_config::AppConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct FulfillmentState {
    pub config: Arc<AppConfig>,
    pub fulfiller: Arc<Fulfiller>,
}

/// Books a free service directly, without checkout.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book",
    request_body = ReservationCommit,
    responses(
        (status = 200, description = "Appointment booked", body = BookingResponse),
        (status = 400, description = "Missing field, unknown or paid service"),
        (status = 409, description = "The slot is no longer available"),
        (status = 502, description = "The calendar rejected the request"),
        (status = 503, description = "Calendar disabled or temporarily unavailable"),
        (status = 504, description = "The calendar did not answer in time")
    ),
    tag = "Booking"
))]
pub async fn book_handler(
    State(state): State<Arc<FulfillmentState>>,
    Json(commit): Json<ReservationCommit>,
) -> Result<Json<BookingResponse>, RendezvousError> {
    if !state.config.use_gcal {
        return Err(unavailable("Booking is currently disabled."));
    }
    info!(service = %commit.service, start = %commit.time_slot, "Free booking requested");

    let response = state.fulfiller.commit_free_booking(&commit).await.map_err(|e| {
        warn!(error = %e, email = %commit.email.trim(), "Free booking failed");
        RendezvousError::from(e)
    })?;
    Ok(Json(response))
}

/// Re-runs the commit of a paid booking, e.g. after a failed webhook.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PaidBookingRequest {
    pub client: ClientDetails,
    pub slots: Vec<TimeSlot>,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
}

fn default_payment_status() -> String {
    PAYMENT_STATUS_PAID.to_string()
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/fulfill/booking",
    request_body = PaidBookingRequest,
    params(
        ("X-Internal-Auth-Secret" = String, Header, description = "Shared secret for internal API authentication.")
    ),
    responses(
        (status = 200, description = "Commit attempted; failed slots are listed", body = BookingResponse),
        (status = 400, description = "Invalid client or no slots"),
        (status = 401, description = "Missing or invalid internal auth secret"),
        (status = 503, description = "Fulfillment disabled")
    ),
    tag = "Fulfillment"
))]
pub async fn fulfill_booking_handler(
    State(state): State<Arc<FulfillmentState>>,
    Json(request): Json<PaidBookingRequest>,
) -> Result<Json<BookingResponse>, RendezvousError> {
    if !state.config.use_fulfillment || !state.config.use_gcal {
        return Err(unavailable("Fulfillment is currently disabled."));
    }
    request
        .client
        .validate()
        .map_err(RendezvousError::from)?;
    if request.slots.is_empty() {
        return Err(validation_error("at least one slot is required"));
    }

    info!(
        email = %request.client.email,
        slots = request.slots.len(),
        "Operator re-running paid booking"
    );
    let response = state
        .fulfiller
        .commit_paid_booking(&request.client, &request.slots, &request.payment_status)
        .await;
    Ok(Json(response))
}
