pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod mock;
pub mod routes;
pub mod service;

pub use error::StripeError;
pub use handlers::StripeState;
pub use routes::routes;
pub use service::{SharedPayments, StripePaymentService};
