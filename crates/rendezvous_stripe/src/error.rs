use rendezvous_common::{external_service_error, HttpStatusCode, RendezvousError};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,

    /// Webhook signature verification failed
    #[error("Stripe webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    /// Session metadata does not describe a booking
    #[error("Missing booking data in session metadata: {0}")]
    MissingBookingData(String),

    #[error("Invalid payment request: {0}")]
    InvalidRequest(String),
}

impl From<StripeError> for RendezvousError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => RendezvousError::from(e),
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                external_service_error("Stripe API", format!("unreadable response: {}", e))
            }
            StripeError::ConfigError => RendezvousError::ConfigError(err.to_string()),
            StripeError::WebhookSignatureError(msg) => {
                RendezvousError::AuthError(format!("Stripe webhook signature error: {}", msg))
            }
            StripeError::MissingBookingData(_) | StripeError::InvalidRequest(_) => {
                RendezvousError::ValidationError(err.to_string())
            }
        }
    }
}

impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 502,
            StripeError::ApiError { .. } => 502,
            StripeError::ParseError(_) => 502,
            StripeError::ConfigError => 500,
            StripeError::WebhookSignatureError(_) => 401,
            StripeError::MissingBookingData(_) => 400,
            StripeError::InvalidRequest(_) => 400,
        }
    }
}
