#![cfg(feature = "openapi")]
use crate::handlers::WebhookAck;
use crate::logic::{CreatePaymentSessionResponse, VerifyPaymentResponse};
use rendezvous_booking::{AppointmentRequest, TimeSlot};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_payment_session_handler,
        crate::handlers::verify_payment_handler,
        crate::handlers::stripe_webhook_handler
    ),
    components(schemas(
        AppointmentRequest,
        TimeSlot,
        CreatePaymentSessionResponse,
        VerifyPaymentResponse,
        WebhookAck
    )),
    tags((name = "Payment", description = "Stripe Checkout for paid services"))
)]
pub struct StripeApiDoc;
