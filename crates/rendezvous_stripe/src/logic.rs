use crate::error::StripeError;
use chrono::DateTime;
use hmac::{Hmac, Mac};
use rendezvous_booking::{ClientDetails, TimeSlot, ValidatedAppointment};
use rendezvous_common::services::CheckoutRequest;
use rendezvous_fulfillment::logic::FailedSlot;
use rendezvous_fulfillment::{BookingResponse, ClientInfo};
use rendezvous_gcal::Appointment;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accepted age of a webhook signature.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

const SLOT_KEY_PREFIX: &str = "slot_";
const SLOT_COUNT_KEY: &str = "slot_count";

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionResponse {
    pub session_id: String,
    pub url: String,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub payment_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub appointments: Vec<Appointment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_slots: Vec<FailedSlot>,
}

impl VerifyPaymentResponse {
    pub fn unpaid(payment_status: &str) -> Self {
        VerifyPaymentResponse {
            success: false,
            payment_status: payment_status.to_string(),
            client_info: None,
            appointments: Vec::new(),
            failed_slots: Vec::new(),
        }
    }
}

impl From<BookingResponse> for VerifyPaymentResponse {
    fn from(booking: BookingResponse) -> Self {
        VerifyPaymentResponse {
            success: booking.success,
            payment_status: booking.payment_status,
            client_info: Some(booking.client_info),
            appointments: booking.appointments,
            failed_slots: booking.failed_slots,
        }
    }
}

/// Webhook event envelope; only the fields used here.
#[derive(Deserialize, Debug, Clone)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// Client details and slots, flattened into Stripe's string metadata.
pub fn encode_booking_metadata(
    client: &ClientDetails,
    slots: &[TimeSlot],
) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("name".to_string(), client.name.clone());
    metadata.insert("email".to_string(), client.email.clone());
    metadata.insert("phone".to_string(), client.phone.clone());
    metadata.insert("service".to_string(), client.service.clone());
    if let Some(address) = client.address.as_ref().filter(|a| !a.trim().is_empty()) {
        metadata.insert("address".to_string(), address.clone());
    }
    if let Some(birthdate) = client.birthdate.as_ref().filter(|b| !b.trim().is_empty()) {
        metadata.insert("birthdate".to_string(), birthdate.clone());
    }
    metadata.insert(SLOT_COUNT_KEY.to_string(), slots.len().to_string());
    for (i, slot) in slots.iter().enumerate() {
        metadata.insert(
            format!("{}{}", SLOT_KEY_PREFIX, i),
            format!("{}|{}", slot.date.to_rfc3339(), slot.end.to_rfc3339()),
        );
    }
    metadata
}

pub fn decode_booking_metadata(
    metadata: &BTreeMap<String, String>,
) -> Result<(ClientDetails, Vec<TimeSlot>), StripeError> {
    let field = |key: &str| {
        metadata
            .get(key)
            .cloned()
            .ok_or_else(|| StripeError::MissingBookingData(key.to_string()))
    };

    let client = ClientDetails {
        name: field("name")?,
        email: field("email")?,
        phone: field("phone")?,
        address: metadata.get("address").cloned(),
        birthdate: metadata.get("birthdate").cloned(),
        service: field("service")?,
    };

    let count: usize = field(SLOT_COUNT_KEY)?
        .parse()
        .map_err(|_| StripeError::MissingBookingData(SLOT_COUNT_KEY.to_string()))?;
    let mut slots = Vec::with_capacity(count);
    for i in 0..count {
        let key = format!("{}{}", SLOT_KEY_PREFIX, i);
        let value = field(&key)?;
        let (start, end) = value
            .split_once('|')
            .ok_or_else(|| StripeError::MissingBookingData(key.clone()))?;
        let parse = |v: &str| {
            DateTime::parse_from_rfc3339(v)
                .map_err(|_| StripeError::MissingBookingData(key.clone()))
        };
        slots.push(TimeSlot::new(parse(start)?, parse(end)?, &client.service));
    }

    Ok((client, slots))
}

/// The checkout for a validated, paid appointment request.
pub fn checkout_request(appointment: &ValidatedAppointment, currency: &str) -> CheckoutRequest {
    let quantity = appointment.slots.len() as u32;
    CheckoutRequest {
        product_name: format!(
            "{} ({} min)",
            appointment.client.service, appointment.quote.duration
        ),
        description: Some(format!(
            "{} appointment{}",
            quantity,
            if quantity > 1 { "s" } else { "" }
        )),
        unit_amount: appointment.quote.price,
        quantity,
        currency: currency.to_string(),
        customer_email: Some(appointment.client.email.clone()),
        metadata: encode_booking_metadata(&appointment.client, &appointment.slots),
    }
}

/// Checks a `Stripe-Signature` header (`t=<unix>,v1=<hex>[,v1=...]`).
pub fn verify_stripe_signature(
    payload: &[u8],
    sig_header: Option<&str>,
    secret: &str,
    now_unix: i64,
) -> Result<(), StripeError> {
    let header = sig_header.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing Stripe-Signature header".to_string())
    })?;

    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();
    for item in header.split(',') {
        match item.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let issued_at: i64 = timestamp.parse().map_err(|_| {
        StripeError::WebhookSignatureError("Invalid timestamp in Stripe-Signature".to_string())
    })?;
    if signatures.is_empty() {
        return Err(StripeError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }
    if (now_unix - issued_at).abs() > SIGNATURE_TOLERANCE_SECS {
        warn!(issued_at, now_unix, "Stripe signature outside tolerance");
        return Err(StripeError::WebhookSignatureError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret".to_string())
    })?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });
    if matched {
        debug!("Stripe webhook signature verified");
        Ok(())
    } else {
        Err(StripeError::WebhookSignatureError(
            "Signature mismatch".to_string(),
        ))
    }
}
