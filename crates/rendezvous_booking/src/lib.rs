// --- File: crates/rendezvous_booking/src/lib.rs ---
//! Booking domain shared by the HTTP crates: what can be booked, for how
//! long, at what price, and which slots a visitor has picked.

pub mod catalog;
#[cfg(test)]
mod catalog_test;
pub mod client;
pub mod error;
pub mod request;
pub mod selection;
pub mod slot;

pub use catalog::{ServiceCatalog, ServiceDuration, BUFFER_MINUTES};
pub use client::ClientDetails;
pub use error::BookingError;
pub use request::{AppointmentRequest, ValidatedAppointment};
pub use selection::{BookingFlow, BookingSelection, SlotPicker};
pub use slot::TimeSlot;
