use rendezvous_booking::BookingError;
use rendezvous_common::RendezvousError;
use rendezvous_gcal::GcalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FulfillmentError {
    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),

    /// Paid services go through checkout instead.
    #[error("{0} requires payment")]
    PaymentRequired(String),

    #[error(transparent)]
    Reservation(#[from] GcalError),
}

impl From<BookingError> for FulfillmentError {
    fn from(err: BookingError) -> Self {
        FulfillmentError::InvalidRequest(err.to_string())
    }
}

impl From<FulfillmentError> for RendezvousError {
    fn from(err: FulfillmentError) -> Self {
        match err {
            FulfillmentError::InvalidRequest(msg) => RendezvousError::ValidationError(msg),
            FulfillmentError::PaymentRequired(_) => RendezvousError::ValidationError(err.to_string()),
            FulfillmentError::Reservation(e) => RendezvousError::from(e),
        }
    }
}
