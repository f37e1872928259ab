use rendezvous_common::RendezvousError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Service {service} is not offered for {minutes} minutes")]
    UnknownDuration { service: String, minutes: i64 },

    #[error("Slot starting at {0} is too short for the selected service")]
    NotEnoughTime(String),

    #[error("Slot starting at {0} overlaps another selected slot")]
    OverlappingSlots(String),

    #[error("At most {0} slot(s) can be selected for this service")]
    SelectionFull(usize),

    #[error("Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: i64, actual: i64 },

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl From<BookingError> for RendezvousError {
    fn from(err: BookingError) -> Self {
        RendezvousError::ValidationError(err.to_string())
    }
}
