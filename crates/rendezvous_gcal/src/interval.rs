// --- File: crates/rendezvous_gcal/src/interval.rs ---
//! Half-open time ranges and the free/booked classification of calendar events.

use chrono::{DateTime, Duration, Utc};
use rendezvous_common::services::CalendarEntry;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Malformed date '{value}': {reason}")]
    MalformedDate { value: String, reason: String },
    #[error("Interval end {end} is not after start {start}")]
    Empty {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// `[start, end)` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        if start >= end {
            return Err(IntervalError::Empty { start, end });
        }
        Ok(Interval { start, end })
    }

    /// Parses two RFC 3339 timestamps.
    pub fn parse(start: &str, end: &str) -> Result<Self, IntervalError> {
        Interval::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        other.start < self.end && other.end > self.start
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end)).ok()
    }
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, IntervalError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| IntervalError::MalformedDate {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Availability published on the provider calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeBlock {
    pub event_id: String,
    pub interval: Interval,
    /// Title of the source event; carries the free marker.
    pub summary: String,
}

/// Anything on the provider calendar that is not availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedBlock {
    pub event_id: String,
    pub interval: Interval,
    pub title: String,
    pub reference: Option<String>,
}

/// A provider event, classified once by its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarBlock {
    Free(FreeBlock),
    Booked(BookedBlock),
}

impl CalendarBlock {
    /// Classifies an entry. Zero-length or inverted events yield `None`.
    pub fn classify(
        entry: &CalendarEntry,
        free_marker: &str,
    ) -> Result<Option<CalendarBlock>, IntervalError> {
        let start = parse_timestamp(&entry.start_time)?;
        let end = parse_timestamp(&entry.end_time)?;
        let interval = match Interval::new(start, end) {
            Ok(interval) => interval,
            Err(_) => {
                tracing::debug!(event_id = %entry.event_id, "Skipping event without duration");
                return Ok(None);
            }
        };

        let block = if is_free_title(&entry.summary, free_marker) {
            CalendarBlock::Free(FreeBlock {
                event_id: entry.event_id.clone(),
                interval,
                summary: entry.summary.clone(),
            })
        } else {
            CalendarBlock::Booked(BookedBlock {
                event_id: entry.event_id.clone(),
                interval,
                title: entry.summary.clone(),
                reference: entry.reference.clone(),
            })
        };
        Ok(Some(block))
    }

    pub fn interval(&self) -> Interval {
        match self {
            CalendarBlock::Free(block) => block.interval,
            CalendarBlock::Booked(block) => block.interval,
        }
    }
}

/// Case-insensitive substring match on the free marker.
pub fn is_free_title(title: &str, free_marker: &str) -> bool {
    title.to_lowercase().contains(&free_marker.to_lowercase())
}
