// --- File: crates/rendezvous_gcal/src/logic.rs ---
use crate::availability::{compute_bookable_slots, BookableSlot};
use crate::interval::{Interval, IntervalError};
use crate::service::GcalServiceError;
use chrono::{DateTime, Duration, Months, Utc};
use chrono_tz::Tz;
use rendezvous_booking::TimeSlot;
use rendezvous_common::services::{BoxFuture, CalendarEntry, CalendarService};
use rendezvous_common::{external_service_error, RendezvousError};
use rendezvous_config::GcalConfig;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Calendar backend shared by handlers and the reservation coordinator.
pub type SharedCalendar = Arc<dyn CalendarService<Error = GcalServiceError>>;

/// Shown to visitors whenever availability cannot be computed.
pub const AVAILABILITY_UNAVAILABLE_MESSAGE: &str =
    "Availability is temporarily unavailable, please try again.";

const READ_ATTEMPTS: u32 = 3;
const READ_BACKOFF_MS: u64 = 200;

#[derive(Error, Debug)]
pub enum GcalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Calendar returned malformed event data: {0}")]
    MalformedEvent(String),
    #[error("Calendar temporarily unavailable: {0}")]
    Transient(String),
    #[error("Calendar call timed out: {0}")]
    Timeout(String),
    #[error("Calendar rejected the request: {0}")]
    Permanent(String),
    #[error("Requested time is no longer available")]
    Conflict,
    #[error("Calendar configuration error: {0}")]
    Config(String),
}

impl GcalError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GcalError::Transient(_) | GcalError::Timeout(_))
    }
}

impl From<GcalServiceError> for GcalError {
    fn from(err: GcalServiceError) -> Self {
        if err.is_transient() {
            GcalError::Transient(err.to_string())
        } else {
            GcalError::Permanent(err.to_string())
        }
    }
}

impl From<IntervalError> for GcalError {
    fn from(err: IntervalError) -> Self {
        GcalError::MalformedEvent(err.to_string())
    }
}

impl From<GcalError> for RendezvousError {
    fn from(err: GcalError) -> Self {
        match err {
            GcalError::InvalidInput(msg) => RendezvousError::ValidationError(msg),
            GcalError::Conflict => RendezvousError::ConflictError(err.to_string()),
            GcalError::Transient(msg) => RendezvousError::UnavailableError(msg),
            GcalError::Timeout(msg) => RendezvousError::TimeoutError(msg),
            GcalError::Config(msg) => RendezvousError::ConfigError(msg),
            GcalError::MalformedEvent(_) | GcalError::Permanent(_) => {
                external_service_error("Google Calendar", err)
            }
        }
    }
}

/// Calendar settings resolved from [`GcalConfig`].
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    pub calendar_id: String,
    pub time_zone: Tz,
    pub free_marker: String,
    pub buffer_title: String,
    pub lead_time: Duration,
    pub max_months_ahead: u32,
    pub provider_timeout: std::time::Duration,
}

impl CalendarSettings {
    pub fn from_config(config: &GcalConfig) -> Result<Self, GcalError> {
        let calendar_id = config
            .calendar_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GcalError::Config("calendar_id is missing".to_string()))?;
        let time_zone = Tz::from_str(config.time_zone()).map_err(|e| {
            GcalError::Config(format!("unknown time zone '{}': {}", config.time_zone(), e))
        })?;

        Ok(CalendarSettings {
            calendar_id,
            time_zone,
            free_marker: config.free_marker().to_string(),
            buffer_title: config.buffer_title().to_string(),
            lead_time: Duration::hours(config.lead_time_hours()),
            max_months_ahead: config.max_months_ahead(),
            provider_timeout: std::time::Duration::from_secs(config.provider_timeout_secs()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
pub struct AvailabilityQuery {
    /// Months to look ahead, clamped to the configured maximum.
    pub months: Option<u32>,
}

/// `[now + lead time, now + months)`, with `months` clamped to `1..=max_months`.
pub fn availability_window(
    now: DateTime<Utc>,
    lead_time: Duration,
    requested_months: Option<u32>,
    max_months: u32,
) -> Result<Interval, GcalError> {
    let months = requested_months.unwrap_or(1).clamp(1, max_months.max(1));
    let end = now
        .checked_add_months(Months::new(months))
        .ok_or_else(|| GcalError::InvalidInput("availability window out of range".to_string()))?;
    Interval::new(now + lead_time, end).map_err(|e| {
        GcalError::Config(format!("lead time leaves no availability window: {}", e))
    })
}

/// Bounds one provider call; a timeout is reported as retryable.
pub async fn call_with_timeout<T>(
    timeout: std::time::Duration,
    operation: &str,
    call: BoxFuture<'_, T, GcalServiceError>,
) -> Result<T, GcalError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(GcalError::from),
        Err(_) => Err(GcalError::Timeout(format!(
            "{} did not answer within {:?}",
            operation, timeout
        ))),
    }
}

/// Lists events, retrying transient failures with exponential backoff.
pub async fn fetch_entries_with_retry(
    calendar: &dyn CalendarService<Error = GcalServiceError>,
    settings: &CalendarSettings,
    window: Interval,
) -> Result<Vec<CalendarEntry>, GcalError> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let call = calendar.list_events(&settings.calendar_id, window.start(), window.end());
        match call_with_timeout(settings.provider_timeout, "list events", call).await {
            Ok(entries) => return Ok(entries),
            Err(err) if err.is_retryable() && attempt < READ_ATTEMPTS => {
                let backoff = READ_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, error = %err, "Retrying calendar read");
                tokio::time::sleep(std::time::Duration::from_millis(backoff)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Bookable slots from `now + lead time` up to the requested number of months.
pub async fn get_availability(
    calendar: &dyn CalendarService<Error = GcalServiceError>,
    settings: &CalendarSettings,
    now: DateTime<Utc>,
    requested_months: Option<u32>,
) -> Result<Vec<TimeSlot>, GcalError> {
    let window = availability_window(
        now,
        settings.lead_time,
        requested_months,
        settings.max_months_ahead,
    )?;
    let entries = fetch_entries_with_retry(calendar, settings, window).await?;
    let slots = compute_bookable_slots(&entries, &settings.free_marker, window)?;
    info!(
        events = entries.len(),
        slots = slots.len(),
        from = %window.start(),
        to = %window.end(),
        "Computed availability"
    );
    Ok(slots
        .iter()
        .map(|slot| to_time_slot(slot, settings.time_zone))
        .collect())
}

/// Wire form of a slot, in the business time zone.
pub fn to_time_slot(slot: &BookableSlot, time_zone: Tz) -> TimeSlot {
    TimeSlot::new(
        slot.start.with_timezone(&time_zone).fixed_offset(),
        slot.end.with_timezone(&time_zone).fixed_offset(),
        &slot.summary,
    )
}
