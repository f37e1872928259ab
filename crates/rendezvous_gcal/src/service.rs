// --- File: crates/rendezvous_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime, EventExtendedProperties};
use rendezvous_common::services::{
    BoxFuture, CalendarEntry, CalendarEvent, CalendarEventResult, CalendarService, Transparency,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::HubType;

/// Private extended property holding the booking reference.
pub const REFERENCE_PROPERTY: &str = "rendezvous_ref";

/// Description line prefix holding the booking reference.
pub const REFERENCE_LINE_PREFIX: &str = "Reference: ";

const MAX_RESULTS_PER_PAGE: i32 = 2500;

#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Unexpected response from calendar: {0}")]
    InvalidResponse(String),
    #[error("Calendar unavailable: {0}")]
    Unavailable(String),
}

impl GcalServiceError {
    /// Whether retrying the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GcalServiceError::ApiError(e) => {
                let text = e.to_string().to_lowercase();
                ["500", "502", "503", "504", "429", "timed out", "connection", "rate limit"]
                    .iter()
                    .any(|marker| text.contains(marker))
            }
            GcalServiceError::Unavailable(_) => true,
            GcalServiceError::TimeParseError(_) | GcalServiceError::InvalidResponse(_) => false,
        }
    }
}

pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
    time_zone: Tz,
}

impl GoogleCalendarService {
    /// All-day events are placed at local midnight in `time_zone`.
    pub fn new(calendar_hub: Arc<HubType>, time_zone: Tz) -> Self {
        Self {
            calendar_hub,
            time_zone,
        }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    fn list_events(
        &self,
        calendar_id: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<CalendarEntry>, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let time_zone = self.time_zone;

        Box::pin(async move {
            let mut entries = Vec::new();
            let mut page_token: Option<String> = None;

            loop {
                let mut request = calendar_hub
                    .events()
                    .list(&calendar_id)
                    .time_min(start_time)
                    .time_max(end_time)
                    .single_events(true) // Expand recurring events
                    .order_by("startTime")
                    .show_deleted(false)
                    .max_results(MAX_RESULTS_PER_PAGE);
                if let Some(token) = page_token.as_deref() {
                    request = request.page_token(token);
                }

                let (_, events) = request.doit().await?;
                for event in events.items.unwrap_or_default() {
                    if let Some(entry) = to_entry(event, time_zone)? {
                        entries.push(entry);
                    }
                }

                page_token = events.next_page_token;
                if page_token.is_none() {
                    break;
                }
            }

            debug!(calendar_id = %calendar_id, count = entries.len(), "Listed calendar events");
            Ok(entries)
        })
    }

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let start_dt = parse_utc(&event.start_time)?;
            let end_dt = parse_utc(&event.end_time)?;
            if end_dt <= start_dt {
                return Err(GcalServiceError::TimeParseError(
                    "End time must be after start time".to_string(),
                ));
            }

            let extended_properties = event.reference.as_ref().map(|reference| {
                EventExtendedProperties {
                    private: Some(HashMap::from([(
                        REFERENCE_PROPERTY.to_string(),
                        reference.clone(),
                    )])),
                    ..Default::default()
                }
            });

            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(start_dt),
                    time_zone: event.time_zone.clone(),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(end_dt),
                    time_zone: event.time_zone,
                    ..Default::default()
                }),
                transparency: Some(event.transparency.as_str().to_string()),
                extended_properties,
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            let event_id = created_event.id.ok_or_else(|| {
                GcalServiceError::InvalidResponse("created event has no id".to_string())
            })?;
            Ok(CalendarEventResult {
                event_id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    fn delete_event(&self, calendar_id: &str, event_id: &str) -> BoxFuture<'_, (), Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let result = calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(e) => {
                    let text = e.to_string();
                    if text.contains("404") || text.contains("410") {
                        warn!(event_id = %event_id, "Event already gone when deleting");
                        Ok(())
                    } else {
                        Err(GcalServiceError::ApiError(e))
                    }
                }
            }
        })
    }
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>, GcalServiceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| GcalServiceError::TimeParseError(format!("'{}': {}", value, e)))
}

/// Converts a provider event; cancelled events and events without times are dropped.
fn to_entry(event: Event, time_zone: Tz) -> Result<Option<CalendarEntry>, GcalServiceError> {
    if event.status.as_deref() == Some("cancelled") {
        return Ok(None);
    }
    let (Some(start), Some(end)) = (
        event.start.as_ref().and_then(|s| event_time(s, time_zone)),
        event.end.as_ref().and_then(|e| event_time(e, time_zone)),
    ) else {
        warn!(event_id = ?event.id, "Skipping event without start or end");
        return Ok(None);
    };

    let reference = event
        .extended_properties
        .as_ref()
        .and_then(|props| props.private.as_ref())
        .and_then(|private| private.get(REFERENCE_PROPERTY).cloned())
        .or_else(|| event.description.as_deref().and_then(reference_from_description));

    Ok(Some(CalendarEntry {
        event_id: event.id.unwrap_or_default(),
        summary: event.summary.unwrap_or_default(),
        description: event.description,
        start_time: start.to_rfc3339(),
        end_time: end.to_rfc3339(),
        transparency: Transparency::from_provider(event.transparency.as_deref()),
        reference,
    }))
}

fn event_time(value: &EventDateTime, time_zone: Tz) -> Option<DateTime<Utc>> {
    match (value.date_time, value.date) {
        (Some(dt), _) => Some(dt),
        (None, Some(date)) => local_midnight(date, time_zone),
        (None, None) => None,
    }
}

/// Start of `date` in `time_zone`, as UTC.
pub fn local_midnight(date: NaiveDate, time_zone: Tz) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    time_zone
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            // Midnight skipped by a DST change; the day starts an hour later.
            time_zone
                .from_local_datetime(&date.and_hms_opt(1, 0, 0)?)
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reads a `Reference: <key>` line written by the reservation coordinator.
pub fn reference_from_description(description: &str) -> Option<String> {
    description
        .lines()
        .find_map(|line| line.trim().strip_prefix(REFERENCE_LINE_PREFIX))
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
