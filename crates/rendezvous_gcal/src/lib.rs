// --- File: crates/rendezvous_gcal/src/lib.rs ---
pub mod auth;
pub mod availability;
#[cfg(test)]
mod availability_proptest;
#[cfg(test)]
mod availability_test;
pub mod doc;
pub mod handlers;
pub mod interval;
pub mod logic;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod reservation;
pub mod routes;
pub mod service;

pub use handlers::GcalState;
pub use logic::{CalendarSettings, GcalError, SharedCalendar};
pub use reservation::{booking_reference, Appointment, ReservationCoordinator};
pub use routes::routes;
pub use service::{GcalServiceError, GoogleCalendarService};
