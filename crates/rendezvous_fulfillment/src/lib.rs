pub mod auth;
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
pub mod routes;

pub use error::FulfillmentError;
pub use handlers::FulfillmentState;
pub use logic::{BookingResponse, ClientInfo, Fulfiller, ReservationCommit};
pub use routes::routes;
