// --- File: crates/rendezvous_booking/src/request.rs ---
use crate::catalog::{total_amount, ServiceCatalog, ServiceDuration};
use crate::client::{require, validate_email, ClientDetails};
use crate::error::BookingError;
use crate::selection::slots_clash;
use crate::slot::TimeSlot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What the confirmation screen submits before payment or a free booking.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub birthdate: Option<String>,
    pub service: String,
    /// Chosen length for services priced by duration.
    pub duration_minutes: Option<i64>,
    /// Chosen appointments, each ending `duration` minutes after its start.
    pub slots: Vec<TimeSlot>,
    /// Total the visitor was shown, in the smallest currency unit.
    pub amount: i64,
}

/// An appointment request that passed every check against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAppointment {
    pub client: ClientDetails,
    pub quote: ServiceDuration,
    /// Sorted by start.
    pub slots: Vec<TimeSlot>,
    pub total_amount: i64,
    pub is_free: bool,
}

impl AppointmentRequest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }

    /// Checks contact fields, service, slot lengths and the total.
    pub fn validate(&self, catalog: &ServiceCatalog) -> Result<ValidatedAppointment, BookingError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require("phone", &self.phone)?;
        require("email", &self.email)?;
        validate_email(&self.email)?;
        require("service", &self.service)?;

        let quote = catalog.quote(&self.service, self.duration_minutes)?;
        let is_free = catalog.is_free(&self.service)?;

        if self.slots.is_empty() {
            return Err(BookingError::InvalidField {
                field: "slots",
                message: "at least one slot is required".to_string(),
            });
        }
        if let Some(max) = catalog.max_slots(&self.service)? {
            if self.slots.len() > max {
                return Err(BookingError::SelectionFull(max));
            }
        }

        let mut slots = self.slots.clone();
        slots.sort_by_key(|s| s.date);
        for slot in &slots {
            if slot.span() != quote.length() {
                return Err(BookingError::InvalidField {
                    field: "slots",
                    message: format!(
                        "slot starting at {} must last {} minutes",
                        slot.date.to_rfc3339(),
                        quote.duration
                    ),
                });
            }
        }
        for pair in slots.windows(2) {
            if slots_clash(&pair[0], &pair[1]) {
                return Err(BookingError::OverlappingSlots(pair[1].date.to_rfc3339()));
            }
        }

        let expected = total_amount(&quote, slots.len());
        if self.amount != expected {
            warn!(
                service = %self.service,
                expected,
                actual = self.amount,
                "Submitted amount does not match the catalog"
            );
            return Err(BookingError::AmountMismatch {
                expected,
                actual: self.amount,
            });
        }

        let client = ClientDetails {
            name: self.full_name(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.clone(),
            birthdate: self.birthdate.clone(),
            service: catalog
                .find(&self.service)
                .map(|o| o.name.clone())
                .unwrap_or_else(|| self.service.clone()),
        };

        debug!(service = %client.service, slots = slots.len(), amount = expected, "Appointment request validated");
        Ok(ValidatedAppointment {
            client,
            quote,
            slots,
            total_amount: expected,
            is_free,
        })
    }
}
