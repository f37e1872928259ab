// --- File: crates/rendezvous_gcal/src/availability.rs ---
//! Turns raw provider events into bookable start points.
//!
//! The pipeline is normalize -> resolve -> quantize: events are split into
//! free and booked blocks by title, booked time is cut out of every free
//! block, and what is left is offered at fixed steps as long as each offered
//! start leaves the minimum appointment length.

use crate::interval::{BookedBlock, CalendarBlock, FreeBlock, Interval, IntervalError};
use chrono::{DateTime, Duration, Utc};
use rendezvous_common::services::CalendarEntry;

/// Distance between two offered start points, in minutes.
pub const SLOT_GRANULARITY_MINUTES: i64 = 15;

/// Shortest bookable appointment, in minutes.
pub const MIN_SLOT_DURATION_MINUTES: i64 = 45;

/// Events of one query, split by the free marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEvents {
    pub free: Vec<FreeBlock>,
    pub booked: Vec<BookedBlock>,
}

/// A candidate start; `end` is the end of the free time it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
}

pub fn normalize_events(
    entries: &[CalendarEntry],
    free_marker: &str,
) -> Result<NormalizedEvents, IntervalError> {
    let mut normalized = NormalizedEvents::default();
    for entry in entries {
        match CalendarBlock::classify(entry, free_marker)? {
            Some(CalendarBlock::Free(block)) => normalized.free.push(block),
            Some(CalendarBlock::Booked(block)) => normalized.booked.push(block),
            None => {}
        }
    }
    Ok(normalized)
}

/// Removes booked time from every free block.
///
/// Each output block keeps the id and summary of the free block it was cut from.
pub fn resolve_overlaps(free: &[FreeBlock], booked: &[BookedBlock]) -> Vec<FreeBlock> {
    let booked: Vec<Interval> = booked.iter().map(|b| b.interval).collect();
    free.iter()
        .flat_map(|block| {
            subtract(block.interval, &booked)
                .into_iter()
                .map(move |interval| FreeBlock {
                    event_id: block.event_id.clone(),
                    interval,
                    summary: block.summary.clone(),
                })
        })
        .collect()
}

/// Maximal sub-intervals of `free` that overlap none of `booked`.
pub fn subtract(free: Interval, booked: &[Interval]) -> Vec<Interval> {
    let mut overlapping: Vec<&Interval> = booked.iter().filter(|b| b.overlaps(&free)).collect();
    if overlapping.is_empty() {
        return vec![free];
    }
    overlapping.sort_by_key(|b| b.start());

    let mut gaps = Vec::new();
    let mut cursor = free.start();
    for busy in overlapping {
        if busy.start() > cursor {
            if let Ok(gap) = Interval::new(cursor, busy.start()) {
                gaps.push(gap);
            }
        }
        cursor = cursor.max(busy.end());
    }
    if cursor < free.end() {
        if let Ok(gap) = Interval::new(cursor, free.end()) {
            gaps.push(gap);
        }
    }
    gaps
}

/// Offers every granularity step of each block that leaves the minimum duration.
pub fn quantize(blocks: &[FreeBlock]) -> Vec<BookableSlot> {
    blocks
        .iter()
        .flat_map(|block| {
            quantize_interval(block.interval)
                .into_iter()
                .map(move |(start, end)| BookableSlot {
                    start,
                    end,
                    summary: block.summary.clone(),
                })
        })
        .collect()
}

/// Start points of one interval, each paired with the rounded interval end.
pub fn quantize_interval(interval: Interval) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let min = Duration::minutes(MIN_SLOT_DURATION_MINUTES);
    if interval.duration() < min {
        return Vec::new();
    }

    let start = round_up(interval.start());
    let end = round_down(interval.end());
    if end - start < min {
        return Vec::new();
    }

    let step = Duration::minutes(SLOT_GRANULARITY_MINUTES);
    let mut points = Vec::new();
    let mut t = start;
    while end - t >= min {
        points.push((t, end));
        t += step;
    }
    points
}

/// Moves up to the next whole minute, then to the next granularity boundary.
///
/// Never returns an instant before `t`.
pub fn round_up(t: DateTime<Utc>) -> DateTime<Utc> {
    let truncated = truncate_to_minute(t);
    let t = if truncated < t {
        truncated + Duration::minutes(1)
    } else {
        truncated
    };
    let rem = minute_remainder(t);
    if rem == 0 {
        t
    } else {
        t + Duration::minutes(SLOT_GRANULARITY_MINUTES - rem)
    }
}

/// Truncates seconds, then moves down to the previous granularity boundary.
pub fn round_down(t: DateTime<Utc>) -> DateTime<Utc> {
    let t = truncate_to_minute(t);
    t - Duration::minutes(minute_remainder(t))
}

fn truncate_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t - Duration::seconds(t.timestamp().rem_euclid(60))
        - Duration::nanoseconds(i64::from(t.timestamp_subsec_nanos()))
}

fn minute_remainder(t: DateTime<Utc>) -> i64 {
    (t.timestamp() / 60).rem_euclid(SLOT_GRANULARITY_MINUTES)
}

/// Runs the whole pipeline for the events of one availability window.
///
/// Free time outside `window` is never offered. Slots are sorted by start;
/// when overlapping free events offer the same start, the longest one wins.
pub fn compute_bookable_slots(
    entries: &[CalendarEntry],
    free_marker: &str,
    window: Interval,
) -> Result<Vec<BookableSlot>, IntervalError> {
    let normalized = normalize_events(entries, free_marker)?;

    let free: Vec<FreeBlock> = normalized
        .free
        .into_iter()
        .filter_map(|block| {
            block.interval.intersection(&window).map(|interval| FreeBlock {
                interval,
                ..block
            })
        })
        .collect();

    let resolved = resolve_overlaps(&free, &normalized.booked);
    let mut slots = quantize(&resolved);
    slots.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    slots.dedup_by_key(|slot| slot.start);
    Ok(slots)
}
