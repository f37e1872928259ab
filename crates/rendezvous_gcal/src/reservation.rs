// --- File: crates/rendezvous_gcal/src/reservation.rs ---
//! Converts a chosen slot into an appointment on the provider calendar.
//!
//! A reservation consumes the free block covering the appointment, gives back
//! the free time before the appointment and after its buffer, and writes the
//! appointment plus an opaque buffer event. Reservations touching the same
//! local day run one at a time, and a retried reservation for the same client
//! and start returns the appointment created by the first attempt.

use crate::availability::normalize_events;
use crate::interval::{parse_timestamp, FreeBlock, Interval};
use crate::logic::{call_with_timeout, CalendarSettings, GcalError, SharedCalendar};
use crate::service::{local_midnight, REFERENCE_LINE_PREFIX};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rendezvous_booking::{ClientDetails, BUFFER_MINUTES};
use rendezvous_common::services::{
    CalendarEntry, CalendarEvent, CalendarEventResult, Transparency,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

/// Appointment length used when the caller gives no distinct end.
pub const DEFAULT_APPOINTMENT_MINUTES: i64 = 60;

/// A committed appointment as stored on the provider calendar.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub event_id: String,
    pub reference: String,
    pub summary: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub start: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub end: DateTime<Utc>,
    pub buffer_event_id: Option<String>,
    /// `false` when an earlier attempt already created this appointment.
    pub created: bool,
}

/// Stable key of a reservation: the client's email and the requested start.
pub fn booking_reference(email: &str, start: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    hasher.update(b"|");
    hasher.update(start.to_rfc3339().as_bytes());
    hex::encode(&hasher.finalize()[..16])
}

/// One async lock per local calendar day, dropped again once idle.
#[derive(Default)]
pub struct DayLocks {
    days: Mutex<HashMap<NaiveDate, Arc<AsyncMutex<()>>>>,
}

pub struct DayGuard<'a> {
    locks: &'a DayLocks,
    day: NaiveDate,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DayLocks {
    pub async fn lock(&self, day: NaiveDate) -> DayGuard<'_> {
        let day_lock = {
            let mut days = self.days.lock().unwrap_or_else(|p| p.into_inner());
            days.entry(day).or_default().clone()
        };
        let guard = day_lock.lock_owned().await;
        DayGuard {
            locks: self,
            day,
            guard: Some(guard),
        }
    }

    /// Days with a reservation in progress or queued.
    pub fn active_days(&self) -> usize {
        self.days.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

impl Drop for DayGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut days = self.locks.days.lock().unwrap_or_else(|p| p.into_inner());
        if days
            .get(&self.day)
            .is_some_and(|day_lock| Arc::strong_count(day_lock) == 1)
        {
            days.remove(&self.day);
        }
    }
}

pub struct ReservationCoordinator {
    calendar: SharedCalendar,
    settings: CalendarSettings,
    day_locks: DayLocks,
}

impl ReservationCoordinator {
    pub fn new(calendar: SharedCalendar, settings: CalendarSettings) -> Self {
        Self {
            calendar,
            settings,
            day_locks: DayLocks::default(),
        }
    }

    pub fn settings(&self) -> &CalendarSettings {
        &self.settings
    }

    pub fn calendar(&self) -> &SharedCalendar {
        &self.calendar
    }

    pub fn day_locks(&self) -> &DayLocks {
        &self.day_locks
    }

    /// Reserves `[chosen_start, chosen_end)` for `client`.
    ///
    /// Fails with [`GcalError::Conflict`] when any booked event overlaps the
    /// appointment or its buffer. Nothing is rolled back when a later step
    /// fails; retrying the same call is safe because the booking reference is
    /// checked first, and a replay restores a buffer the first attempt missed.
    pub async fn reserve(
        &self,
        client: &ClientDetails,
        chosen_start: DateTime<Utc>,
        chosen_end: Option<DateTime<Utc>>,
    ) -> Result<Appointment, GcalError> {
        client
            .validate()
            .map_err(|e| GcalError::InvalidInput(e.to_string()))?;

        let chosen_end = match chosen_end {
            Some(end) if end != chosen_start => end,
            _ => chosen_start + Duration::minutes(DEFAULT_APPOINTMENT_MINUTES),
        };
        let appointment = Interval::new(chosen_start, chosen_end).map_err(|_| {
            GcalError::InvalidInput(format!(
                "appointment end {} is before its start {}",
                chosen_end, chosen_start
            ))
        })?;
        let reference = booking_reference(&client.email, chosen_start);

        let day = chosen_start
            .with_timezone(&self.settings.time_zone)
            .date_naive();
        let _day_guard = self.day_locks.lock(day).await;
        let search_window = self.day_window(day)?;

        let entries = call_with_timeout(
            self.settings.provider_timeout,
            "list events",
            self.calendar.list_events(
                &self.settings.calendar_id,
                search_window.start(),
                search_window.end(),
            ),
        )
        .await?;

        if let Some(mut existing) = self.find_existing(&entries, &reference)? {
            if existing.buffer_event_id.is_none() {
                let buffer = self
                    .create_buffer(&existing.summary, existing.end)
                    .await?;
                warn!(
                    reference = %reference,
                    buffer_event_id = %buffer.event_id,
                    "Restored missing buffer of a committed reservation"
                );
                existing.buffer_event_id = Some(buffer.event_id);
            }
            info!(reference = %reference, event_id = %existing.event_id, "Reservation already committed");
            return Ok(existing);
        }

        let buffer_end = chosen_end + Duration::minutes(BUFFER_MINUTES);
        let occupied = Interval::new(chosen_start, buffer_end)
            .map_err(|e| GcalError::InvalidInput(e.to_string()))?;
        let blocks = normalize_events(&entries, &self.settings.free_marker)?;
        if let Some(clash) = blocks.booked.iter().find(|b| b.interval.overlaps(&occupied)) {
            warn!(
                day = %day,
                clashing_event = %clash.event_id,
                "Requested time already booked"
            );
            return Err(GcalError::Conflict);
        }
        let covering = blocks
            .free
            .into_iter()
            .find(|block| block.interval.contains(&appointment));

        match &covering {
            Some(block) => {
                self.delete(&block.event_id).await?;
                debug!(event_id = %block.event_id, "Consumed free block");

                if block.interval.start() < chosen_start {
                    self.donate(block, block.interval.start(), chosen_start)
                        .await?;
                }
                if buffer_end < block.interval.end() {
                    self.donate(block, buffer_end, block.interval.end()).await?;
                }
            }
            None => {
                warn!(
                    day = %day,
                    reference = %reference,
                    operator_review = true,
                    "No free block covers the appointment; booking without reclaiming free time"
                );
            }
        }

        let title = client.appointment_title();
        let mut description = client.description_lines();
        description.push(format!("{}{}", REFERENCE_LINE_PREFIX, reference));
        let created = self
            .create(CalendarEvent {
                start_time: self.local(chosen_start),
                end_time: self.local(chosen_end),
                summary: title.clone(),
                description: Some(description.join("\n")),
                time_zone: Some(self.settings.time_zone.name().to_string()),
                transparency: Transparency::Opaque,
                reference: Some(reference.clone()),
            })
            .await?;

        let buffer = self.create_buffer(&title, chosen_end).await?;

        info!(
            reference = %reference,
            event_id = %created.event_id,
            buffer_event_id = %buffer.event_id,
            start = %chosen_start,
            end = %chosen_end,
            "Reservation committed"
        );

        Ok(Appointment {
            event_id: created.event_id,
            reference,
            summary: title,
            start: chosen_start,
            end: chosen_end,
            buffer_event_id: Some(buffer.event_id),
            created: true,
        })
    }

    fn day_window(&self, day: NaiveDate) -> Result<Interval, GcalError> {
        let next_day = day
            .succ_opt()
            .ok_or_else(|| GcalError::InvalidInput(format!("no day after {}", day)))?;
        let start = local_midnight(day, self.settings.time_zone);
        let end = local_midnight(next_day, self.settings.time_zone);
        match (start, end) {
            (Some(start), Some(end)) => Interval::new(start, end)
                .map_err(|e| GcalError::InvalidInput(e.to_string())),
            _ => Err(GcalError::InvalidInput(format!(
                "cannot resolve local day {}",
                day
            ))),
        }
    }

    fn find_existing(
        &self,
        entries: &[CalendarEntry],
        reference: &str,
    ) -> Result<Option<Appointment>, GcalError> {
        let Some(entry) = entries
            .iter()
            .find(|e| e.reference.as_deref() == Some(reference))
        else {
            return Ok(None);
        };

        let start = parse_timestamp(&entry.start_time)?;
        let end = parse_timestamp(&entry.end_time)?;
        let buffer_event_id = entries
            .iter()
            .find(|e| {
                e.summary == self.settings.buffer_title
                    && parse_timestamp(&e.start_time).ok() == Some(end)
            })
            .map(|e| e.event_id.clone());

        Ok(Some(Appointment {
            event_id: entry.event_id.clone(),
            reference: reference.to_string(),
            summary: entry.summary.clone(),
            start,
            end,
            buffer_event_id,
            created: false,
        }))
    }

    /// Opaque preparation time right after an appointment ending at `start`.
    async fn create_buffer(
        &self,
        appointment_title: &str,
        start: DateTime<Utc>,
    ) -> Result<CalendarEventResult, GcalError> {
        self.create(CalendarEvent {
            start_time: self.local(start),
            end_time: self.local(start + Duration::minutes(BUFFER_MINUTES)),
            summary: self.settings.buffer_title.clone(),
            description: Some(format!("After {}", appointment_title)),
            time_zone: Some(self.settings.time_zone.name().to_string()),
            transparency: Transparency::Opaque,
            reference: None,
        })
        .await
    }

    async fn donate(
        &self,
        source: &FreeBlock,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), GcalError> {
        let created = self
            .create(CalendarEvent {
                start_time: self.local(start),
                end_time: self.local(end),
                summary: source.summary.clone(),
                description: None,
                time_zone: Some(self.settings.time_zone.name().to_string()),
                transparency: Transparency::Transparent,
                reference: None,
            })
            .await?;
        debug!(event_id = %created.event_id, %start, %end, "Re-donated free time");
        Ok(())
    }

    async fn create(
        &self,
        event: CalendarEvent,
    ) -> Result<CalendarEventResult, GcalError> {
        call_with_timeout(
            self.settings.provider_timeout,
            "create event",
            self.calendar
                .create_event(&self.settings.calendar_id, event),
        )
        .await
    }

    async fn delete(&self, event_id: &str) -> Result<(), GcalError> {
        call_with_timeout(
            self.settings.provider_timeout,
            "delete event",
            self.calendar
                .delete_event(&self.settings.calendar_id, event_id),
        )
        .await
    }

    fn local(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.settings.time_zone).to_rfc3339()
    }
}
