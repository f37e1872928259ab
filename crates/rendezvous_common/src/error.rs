// --- File: crates/rendezvous_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by every Rendezvous crate.
///
/// Integration crates keep their own error enums and convert into this one
/// with `From<SpecificError> for RendezvousError` at the HTTP boundary.
#[derive(Error, Debug)]
pub enum RendezvousError {
    /// An outbound HTTP request could not be completed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Input or provider data could not be parsed.
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Client input was rejected before any provider call.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A provider answered with a permanent failure.
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// A dependency is disabled or failing for now. Displayed verbatim.
    #[error("{0}")]
    UnavailableError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error to the HTTP status code it should be reported with.
pub trait HttpStatusCode {
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RendezvousError {
    fn status_code(&self) -> u16 {
        match self {
            RendezvousError::HttpError(_) => 502,
            RendezvousError::ParseError(_) => 400,
            RendezvousError::ConfigError(_) => 500,
            RendezvousError::AuthError(_) => 401,
            RendezvousError::ValidationError(_) => 400,
            RendezvousError::ExternalServiceError { .. } => 502,
            RendezvousError::ConflictError(_) => 409,
            RendezvousError::NotFoundError(_) => 404,
            RendezvousError::TimeoutError(_) => 504,
            RendezvousError::UnavailableError(_) => 503,
            RendezvousError::InternalError(_) => 500,
        }
    }
}

impl From<reqwest::Error> for RendezvousError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RendezvousError::TimeoutError(err.to_string())
        } else {
            RendezvousError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RendezvousError {
    fn from(err: serde_json::Error) -> Self {
        RendezvousError::ParseError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> RendezvousError {
    RendezvousError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> RendezvousError {
    RendezvousError::ValidationError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> RendezvousError {
    RendezvousError::ConflictError(message.to_string())
}

pub fn unavailable<T: fmt::Display>(message: T) -> RendezvousError {
    RendezvousError::UnavailableError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> RendezvousError {
    RendezvousError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> RendezvousError {
    RendezvousError::InternalError(message.to_string())
}
