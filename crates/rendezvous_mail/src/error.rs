use rendezvous_common::{external_service_error, HttpStatusCode, RendezvousError};
use thiserror::Error;

/// Mail-specific error types.
#[derive(Error, Debug)]
pub enum MailError {
    /// Error occurred while calling the mail API
    #[error("Mail API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the mail API
    #[error("Mail API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Mail configuration missing or incomplete")]
    ConfigError,

    /// The message cannot be sent as given
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

impl From<MailError> for RendezvousError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::RequestError(e) => RendezvousError::from(e),
            MailError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Mail API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            MailError::ConfigError => RendezvousError::ConfigError(err.to_string()),
            MailError::InvalidMessage(msg) => RendezvousError::ValidationError(msg),
        }
    }
}

impl HttpStatusCode for MailError {
    fn status_code(&self) -> u16 {
        match self {
            MailError::RequestError(_) => 502,
            MailError::ApiError { .. } => 502,
            MailError::ConfigError => 500,
            MailError::InvalidMessage(_) => 400,
        }
    }
}
