//! Availability computed from realistic calendar contents through the public API.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use rendezvous_common::services::{CalendarEntry, Transparency};
use rendezvous_gcal::availability::{compute_bookable_slots, BookableSlot};
use rendezvous_gcal::interval::Interval;
use rendezvous_gcal::logic::to_time_slot;

const MARKER: &str = "free";

fn entry(summary: &str, start: &str, end: &str, transparency: Transparency) -> CalendarEntry {
    CalendarEntry {
        event_id: format!("{}@{}", summary, start),
        summary: summary.to_string(),
        description: None,
        start_time: start.to_string(),
        end_time: end.to_string(),
        transparency,
        reference: None,
    }
}

fn at(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
}

fn march() -> Interval {
    Interval::parse("2026-03-01T00:00:00-05:00", "2026-03-31T00:00:00-04:00").unwrap()
}

fn busy_monday() -> Vec<CalendarEntry> {
    vec![
        entry("Free", "2026-03-02T09:00:00-05:00", "2026-03-02T17:00:00-05:00", Transparency::Transparent),
        entry("Massage - Marie Tremblay", "2026-03-02T10:00:00-05:00", "2026-03-02T11:00:00-05:00", Transparency::Opaque),
        entry("Preparation", "2026-03-02T11:00:00-05:00", "2026-03-02T11:15:00-05:00", Transparency::Opaque),
        entry("Walk-in", "2026-03-02T12:30:00-05:00", "2026-03-02T13:30:00-05:00", Transparency::Opaque),
    ]
}

fn starts(slots: &[BookableSlot]) -> Vec<DateTime<Utc>> {
    slots.iter().map(|slot| slot.start).collect()
}

#[test]
fn busy_day_offers_only_the_gaps() {
    let slots = compute_bookable_slots(&busy_monday(), MARKER, march()).unwrap();

    assert_eq!(slots.len(), 17);
    assert_eq!(
        starts(&slots)[..5],
        [
            at("2026-03-02T09:00:00-05:00"),
            at("2026-03-02T09:15:00-05:00"),
            at("2026-03-02T11:15:00-05:00"),
            at("2026-03-02T11:30:00-05:00"),
            at("2026-03-02T11:45:00-05:00"),
        ]
    );
    assert_eq!(slots[0].end, at("2026-03-02T10:00:00-05:00"));
    assert_eq!(slots[16].start, at("2026-03-02T16:15:00-05:00"));
    assert_eq!(slots[16].end, at("2026-03-02T17:00:00-05:00"));
}

#[test]
fn offered_minimum_never_touches_a_booking() {
    let entries = busy_monday();
    let booked: Vec<Interval> = entries[1..]
        .iter()
        .map(|e| Interval::parse(&e.start_time, &e.end_time).unwrap())
        .collect();

    for slot in compute_bookable_slots(&entries, MARKER, march()).unwrap() {
        let offered = Interval::new(slot.start, slot.start + Duration::minutes(45)).unwrap();
        assert!(
            booked.iter().all(|b| !b.overlaps(&offered)),
            "{} overlaps a booking",
            slot.start
        );
        assert!(slot.start < slot.end);
    }
}

#[test]
fn window_start_clips_and_rounds_up() {
    let entries = vec![entry(
        "Free",
        "2026-03-02T09:00:00-05:00",
        "2026-03-02T12:00:00-05:00",
        Transparency::Transparent,
    )];
    let window = Interval::new(at("2026-03-02T10:07:00-05:00"), at("2026-03-31T00:00:00-04:00")).unwrap();

    let slots = compute_bookable_slots(&entries, MARKER, window).unwrap();
    assert_eq!(slots.first().map(|s| s.start), Some(at("2026-03-02T10:15:00-05:00")));
    assert_eq!(slots.last().map(|s| s.start), Some(at("2026-03-02T11:15:00-05:00")));
    assert_eq!(slots.len(), 5);
}

#[test]
fn marker_matching_ignores_case_and_surrounding_words() {
    let entries = vec![entry(
        "Morning FREE time",
        "2026-03-03T09:00:00-05:00",
        "2026-03-03T09:45:00-05:00",
        Transparency::Transparent,
    )];
    let slots = compute_bookable_slots(&entries, MARKER, march()).unwrap();
    assert_eq!(starts(&slots), vec![at("2026-03-03T09:00:00-05:00")]);
    assert_eq!(slots[0].summary, "Morning FREE time");
}

#[test]
fn slots_render_with_the_offset_of_their_own_day() {
    let entries = vec![
        entry("Free", "2026-03-06T09:00:00-05:00", "2026-03-06T10:00:00-05:00", Transparency::Transparent),
        entry("Free", "2026-03-09T09:00:00-04:00", "2026-03-09T10:00:00-04:00", Transparency::Transparent),
    ];
    let slots = compute_bookable_slots(&entries, MARKER, march()).unwrap();
    let rendered: Vec<String> = slots
        .iter()
        .map(|slot| to_time_slot(slot, Tz::America__Toronto).date.to_rfc3339())
        .collect();

    assert!(rendered.contains(&"2026-03-06T09:00:00-05:00".to_string()));
    assert!(rendered.contains(&"2026-03-09T09:00:00-04:00".to_string()));
}

#[test]
fn malformed_dates_fail_the_whole_computation() {
    let entries = vec![entry("Free", "tomorrow", "2026-03-02T10:00:00-05:00", Transparency::Transparent)];
    assert!(compute_bookable_slots(&entries, MARKER, march()).is_err());
}
