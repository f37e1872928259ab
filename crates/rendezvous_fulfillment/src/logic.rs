//! Turns a confirmed booking into calendar appointments and emails.
//!
//! Free bookings report reservation failures to the caller. Paid bookings
//! have already been charged, so failures are logged for reconciliation and
//! the booking is still reported as successful.

use crate::error::FulfillmentError;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use rendezvous_booking::{ClientDetails, ServiceCatalog, TimeSlot};
use rendezvous_gcal::{Appointment, ReservationCoordinator};
use rendezvous_mail::messages::{booking_confirmation, booking_notice};
use rendezvous_mail::SharedNotifier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const PAYMENT_STATUS_FREE: &str = "free";
pub const PAYMENT_STATUS_PAID: &str = "paid";

/// A single free appointment as submitted by the confirmation screen.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReservationCommit {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub birthdate: Option<String>,
    pub service: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub time_slot: DateTime<FixedOffset>,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>, format = DateTime))]
    pub time_slot_end: Option<DateTime<FixedOffset>>,
}

impl ReservationCommit {
    pub fn client(&self) -> ClientDetails {
        ClientDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.clone(),
            birthdate: self.birthdate.clone(),
            service: self.service.trim().to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    /// Start of the first appointment, RFC 3339 in the business time zone.
    pub time_slot: Option<String>,
}

impl ClientInfo {
    fn new(client: &ClientDetails, first_slot: Option<&TimeSlot>) -> Self {
        ClientInfo {
            name: client.name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            service: client.service.clone(),
            time_slot: first_slot.map(|slot| slot.date.to_rfc3339()),
        }
    }
}

/// A slot of a paid booking that could not be put on the calendar.
#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FailedSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub date: DateTime<FixedOffset>,
    pub error: String,
    pub retryable: bool,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    pub client_info: ClientInfo,
    pub payment_status: String,
    pub appointments: Vec<Appointment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_slots: Vec<FailedSlot>,
}

/// Where confirmation emails go once a booking is committed.
#[derive(Clone)]
pub struct Notifications {
    pub notifier: SharedNotifier,
    pub business_address: String,
}

pub struct Fulfiller {
    coordinator: Arc<ReservationCoordinator>,
    catalog: ServiceCatalog,
    notifications: Option<Notifications>,
}

impl Fulfiller {
    pub fn new(
        coordinator: Arc<ReservationCoordinator>,
        catalog: ServiceCatalog,
        notifications: Option<Notifications>,
    ) -> Self {
        Self {
            coordinator,
            catalog,
            notifications,
        }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Books one free appointment. Every reservation error reaches the caller.
    pub async fn commit_free_booking(
        &self,
        commit: &ReservationCommit,
    ) -> Result<BookingResponse, FulfillmentError> {
        let client = commit.client();
        client.validate()?;
        if !self.catalog.is_free(&client.service)? {
            return Err(FulfillmentError::PaymentRequired(client.service.clone()));
        }
        let quote = self.catalog.quote(&client.service, None)?;
        let start = commit.time_slot;
        let end = start + Duration::minutes(quote.duration);
        if let Some(requested_end) = commit.time_slot_end {
            if requested_end != end {
                warn!(
                    service = %client.service,
                    requested_end = %requested_end,
                    expected_end = %end,
                    "Free booking end does not match the service duration"
                );
                return Err(FulfillmentError::InvalidRequest(format!(
                    "timeSlotEnd must be {} for {}",
                    end.to_rfc3339(),
                    client.service
                )));
            }
        }

        let appointment = self
            .coordinator
            .reserve(&client, start.with_timezone(&Utc), Some(end.with_timezone(&Utc)))
            .await?;

        let slots = vec![self.local_slot(&appointment)];
        if appointment.created {
            self.notify(&client, &slots, PAYMENT_STATUS_FREE).await;
        }

        Ok(BookingResponse {
            success: true,
            client_info: ClientInfo::new(&client, slots.first()),
            payment_status: PAYMENT_STATUS_FREE.to_string(),
            appointments: vec![appointment],
            failed_slots: Vec::new(),
        })
    }

    /// Books every slot of a paid checkout.
    ///
    /// The client has paid at this point, so a slot that cannot be reserved
    /// is logged for operator review instead of failing the booking.
    pub async fn commit_paid_booking(
        &self,
        client: &ClientDetails,
        slots: &[TimeSlot],
        payment_status: &str,
    ) -> BookingResponse {
        let mut appointments = Vec::new();
        let mut failed_slots = Vec::new();

        for slot in slots {
            let start = slot.date.with_timezone(&Utc);
            let end = slot.end.with_timezone(&Utc);
            match self.coordinator.reserve(client, start, Some(end)).await {
                Ok(appointment) => appointments.push(appointment),
                Err(e) => {
                    error!(
                        operator_review = true,
                        email = %client.email,
                        service = %client.service,
                        start = %slot.date,
                        retryable = e.is_retryable(),
                        error = %e,
                        "Paid appointment could not be reserved"
                    );
                    failed_slots.push(FailedSlot {
                        date: slot.date,
                        error: e.to_string(),
                        retryable: e.is_retryable(),
                    });
                }
            }
        }

        let booked: Vec<TimeSlot> = appointments.iter().map(|a| self.local_slot(a)).collect();
        if appointments.iter().any(|a| a.created) {
            self.notify(client, &booked, payment_status).await;
        }
        info!(
            email = %client.email,
            booked = appointments.len(),
            failed = failed_slots.len(),
            "Paid booking committed"
        );

        BookingResponse {
            success: true,
            client_info: ClientInfo::new(client, booked.first().or(slots.first())),
            payment_status: payment_status.to_string(),
            appointments,
            failed_slots,
        }
    }

    /// Sends the client confirmation and the business notice; failures are only logged.
    async fn notify(&self, client: &ClientDetails, slots: &[TimeSlot], payment_status: &str) {
        let Some(notifications) = &self.notifications else {
            return;
        };
        let messages = [
            booking_confirmation(client, slots, &notifications.business_address),
            booking_notice(client, slots, payment_status, &notifications.business_address),
        ];
        for message in messages {
            let to = message.to.clone();
            if let Err(e) = notifications.notifier.send_email(message).await {
                warn!(to = %to, error = %e, "Booking email not sent");
            }
        }
    }

    fn local_slot(&self, appointment: &Appointment) -> TimeSlot {
        let time_zone = self.coordinator.settings().time_zone;
        TimeSlot::new(
            appointment.start.with_timezone(&time_zone).fixed_offset(),
            appointment.end.with_timezone(&time_zone).fixed_offset(),
            &appointment.summary,
        )
    }
}
