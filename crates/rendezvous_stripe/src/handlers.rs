use crate::error::StripeError;
use crate::logic::{
    checkout_request, decode_booking_metadata, verify_stripe_signature,
    CreatePaymentSessionResponse, StripeEvent, VerifyPaymentResponse, CHECKOUT_COMPLETED,
};
use crate::service::{SharedPayments, StripeSessionObject};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use chrono::Utc;
use rendezvous_booking::AppointmentRequest;
use rendezvous_common::services::CheckoutSessionStatus;
use rendezvous_common::{unavailable, validation_error, RendezvousError};
use rendezvous_config::{AppConfig, StripeConfig};
use rendezvous_fulfillment::Fulfiller;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct StripeState {
    pub config: Arc<AppConfig>,
    pub payments: SharedPayments,
    pub fulfiller: Arc<Fulfiller>,
}

impl StripeState {
    fn stripe_config(&self) -> Result<&StripeConfig, RendezvousError> {
        if !self.config.use_stripe {
            return Err(unavailable("Payments are currently disabled."));
        }
        self.config
            .stripe
            .as_ref()
            .ok_or_else(|| StripeError::ConfigError.into())
    }

    /// Commits the booking carried by a paid session. Safe to call twice.
    async fn commit(&self, session: &CheckoutSessionStatus) -> Result<VerifyPaymentResponse, StripeError> {
        let (client, slots) = decode_booking_metadata(&session.metadata)?;
        let booking = self
            .fulfiller
            .commit_paid_booking(&client, &slots, &session.payment_status)
            .await;
        Ok(booking.into())
    }
}

/// Starts a checkout for a paid appointment request.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/create-payment-session",
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CreatePaymentSessionResponse),
        (status = 400, description = "Invalid request, free service or wrong amount"),
        (status = 502, description = "Stripe rejected the request"),
        (status = 503, description = "Payments disabled")
    ),
    tag = "Payment"
))]
pub async fn create_payment_session_handler(
    State(state): State<Arc<StripeState>>,
    Json(request): Json<AppointmentRequest>,
) -> Result<Json<CreatePaymentSessionResponse>, RendezvousError> {
    let stripe_config = state.stripe_config()?;
    let appointment = request.validate(state.fulfiller.catalog())?;
    if appointment.is_free {
        return Err(validation_error(format!(
            "{} is free; book it directly",
            appointment.client.service
        )));
    }

    let checkout = checkout_request(&appointment, stripe_config.currency());
    let session = state
        .payments
        .create_checkout_session(checkout)
        .await
        .map_err(|e| {
            error!(error = %e, email = %appointment.client.email, "Checkout session not created");
            RendezvousError::from(e)
        })?;

    info!(
        session_id = %session.session_id,
        service = %appointment.client.service,
        slots = appointment.slots.len(),
        amount = appointment.total_amount,
        "Checkout started"
    );
    Ok(Json(CreatePaymentSessionResponse {
        session_id: session.session_id,
        url: session.url,
    }))
}

/// Called by the success page; commits the booking once the session is paid.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/verify-payment/{session_id}",
    params(("session_id" = String, Path, description = "Stripe checkout session id")),
    responses(
        (status = 200, description = "Payment state, with the booking when paid", body = VerifyPaymentResponse),
        (status = 400, description = "Session does not describe a booking"),
        (status = 502, description = "Stripe rejected the request"),
        (status = 503, description = "Payments disabled")
    ),
    tag = "Payment"
))]
pub async fn verify_payment_handler(
    State(state): State<Arc<StripeState>>,
    Path(session_id): Path<String>,
) -> Result<Json<VerifyPaymentResponse>, RendezvousError> {
    state.stripe_config()?;
    let session = state
        .payments
        .retrieve_checkout_session(&session_id)
        .await?;

    if !session.is_paid() {
        info!(session_id = %session_id, status = %session.payment_status, "Session not paid");
        return Ok(Json(VerifyPaymentResponse::unpaid(&session.payment_status)));
    }

    let response = state.commit(&session).await?;
    Ok(Json(response))
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookAck {
    pub received: bool,
}

/// Stripe server-to-server notifications.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/stripe/webhook",
    responses(
        (status = 200, description = "Event received", body = WebhookAck),
        (status = 400, description = "Session does not describe a booking"),
        (status = 401, description = "Invalid signature"),
        (status = 503, description = "Payments disabled")
    ),
    tag = "Payment"
))]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<StripeState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookAck>, RendezvousError> {
    let stripe_config = state.stripe_config()?;
    let secret = stripe_config
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(StripeError::ConfigError)?;

    let signature = headers.get("stripe-signature").and_then(|h| h.to_str().ok());
    verify_stripe_signature(body.as_bytes(), signature, secret, Utc::now().timestamp())
        .map_err(|e| {
            warn!(error = %e, "Rejected Stripe webhook");
            RendezvousError::from(e)
        })?;

    let event: StripeEvent = serde_json::from_str(&body)
        .map_err(|e| validation_error(format!("invalid webhook payload: {}", e)))?;
    if event.event_type != CHECKOUT_COMPLETED {
        info!(event_id = %event.id, event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(Json(WebhookAck { received: true }));
    }

    let session: CheckoutSessionStatus =
        serde_json::from_value::<StripeSessionObject>(event.data.object)
            .map_err(|e| validation_error(format!("invalid checkout session: {}", e)))?
            .into();
    if session.is_paid() {
        let outcome = state.commit(&session).await?;
        info!(
            event_id = %event.id,
            session_id = %session.session_id,
            booked = outcome.appointments.len(),
            failed = outcome.failed_slots.len(),
            "Webhook booking committed"
        );
    } else {
        info!(session_id = %session.session_id, status = %session.payment_status, "Completed session not paid yet");
    }
    Ok(Json(WebhookAck { received: true }))
}
