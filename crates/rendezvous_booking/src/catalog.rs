// --- File: crates/rendezvous_booking/src/catalog.rs ---
use crate::error::BookingError;
use crate::slot::TimeSlot;
use chrono::Duration;
use rendezvous_config::{DurationOption, ServiceOffering};
use serde::{Deserialize, Serialize};

/// Preparation time kept free after every appointment.
pub const BUFFER_MINUTES: i64 = 15;

/// Length of a service that does not state its own duration.
pub const DEFAULT_SERVICE_MINUTES: i64 = 30;

/// Name used when the visitor did not pick a service explicitly.
pub const DEFAULT_SERVICE_NAME: &str = "Physiotherapy Session";

/// Length and price of one appointment of a service.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDuration {
    /// Minutes.
    pub duration: i64,
    /// Smallest currency unit.
    pub price: i64,
}

impl ServiceDuration {
    pub fn length(&self) -> Duration {
        Duration::minutes(self.duration)
    }

    /// Time an offered slot must leave for this appointment and its buffer.
    pub fn required_minutes(&self) -> i64 {
        self.duration + BUFFER_MINUTES
    }

    /// Whether an offered slot leaves room for the appointment plus buffer.
    pub fn has_enough_duration(&self, slot: &TimeSlot) -> bool {
        slot.span() >= Duration::minutes(self.required_minutes())
    }
}

/// The services offered, as configured under `services`.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    offerings: Vec<ServiceOffering>,
}

impl ServiceCatalog {
    pub fn new(offerings: Vec<ServiceOffering>) -> Self {
        ServiceCatalog { offerings }
    }

    pub fn offerings(&self) -> &[ServiceOffering] {
        &self.offerings
    }

    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&ServiceOffering> {
        let name = name.trim();
        self.offerings
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }

    pub fn is_free(&self, name: &str) -> Result<bool, BookingError> {
        self.find(name)
            .map(|o| o.is_free)
            .ok_or_else(|| BookingError::UnknownService(name.to_string()))
    }

    /// Resolves the length and price of one appointment.
    ///
    /// Services with duration options require `duration_minutes` unless it is
    /// omitted, in which case the option closest to 60 minutes is used.
    pub fn quote(
        &self,
        name: &str,
        duration_minutes: Option<i64>,
    ) -> Result<ServiceDuration, BookingError> {
        let offering = self
            .find(name)
            .ok_or_else(|| BookingError::UnknownService(name.to_string()))?;

        if offering.durations.is_empty() {
            let duration = offering.duration_minutes.unwrap_or(DEFAULT_SERVICE_MINUTES);
            if let Some(requested) = duration_minutes {
                if requested != duration {
                    return Err(BookingError::UnknownDuration {
                        service: offering.name.clone(),
                        minutes: requested,
                    });
                }
            }
            let price = if offering.is_free { 0 } else { offering.price };
            return Ok(ServiceDuration { duration, price });
        }

        let option = match duration_minutes {
            Some(minutes) => offering
                .durations
                .iter()
                .find(|d| d.duration_minutes == minutes)
                .ok_or_else(|| BookingError::UnknownDuration {
                    service: offering.name.clone(),
                    minutes,
                })?,
            None => default_option(&offering.durations).ok_or_else(|| {
                BookingError::UnknownService(offering.name.clone())
            })?,
        };

        Ok(ServiceDuration {
            duration: option.duration_minutes,
            price: if offering.is_free { 0 } else { option.price },
        })
    }

    /// Free services book a single slot; paid services are unbounded.
    pub fn max_slots(&self, name: &str) -> Result<Option<usize>, BookingError> {
        Ok(if self.is_free(name)? { Some(1) } else { None })
    }
}

/// Price of `slot_count` appointments.
pub fn total_amount(quote: &ServiceDuration, slot_count: usize) -> i64 {
    quote.price * slot_count as i64
}

fn default_option(options: &[DurationOption]) -> Option<&DurationOption> {
    options
        .iter()
        .min_by_key(|d| (d.duration_minutes - 60).abs())
}
