#[cfg(test)]
mod tests {
    use crate::availability::{
        compute_bookable_slots, normalize_events, quantize, quantize_interval, resolve_overlaps,
        round_down, round_up, subtract,
    };
    use crate::interval::{FreeBlock, Interval, IntervalError};
    use crate::logic::{
        availability_window, get_availability, to_time_slot, CalendarSettings, GcalError,
    };
    use crate::mock::{InMemoryCalendar, Operation};
    use chrono::{DateTime, Duration, Utc};
    use chrono_tz::Tz;
    use rendezvous_common::services::{CalendarEntry, Transparency};

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    fn interval(start: &str, end: &str) -> Interval {
        Interval::parse(start, end).unwrap()
    }

    fn entry(summary: &str, start: &str, end: &str) -> CalendarEntry {
        CalendarEntry {
            event_id: format!("{}-{}", summary, start),
            summary: summary.into(),
            description: None,
            start_time: start.into(),
            end_time: end.into(),
            transparency: Transparency::Opaque,
            reference: None,
        }
    }

    fn settings() -> CalendarSettings {
        CalendarSettings {
            calendar_id: "primary".into(),
            time_zone: Tz::America__Toronto,
            free_marker: "free".into(),
            buffer_title: "Preparation".into(),
            lead_time: Duration::hours(48),
            max_months_ahead: 1,
            provider_timeout: std::time::Duration::from_secs(5),
        }
    }

    #[test]
    fn two_hour_block_offers_six_starts() {
        let points = quantize_interval(interval("2026-02-10T09:00:00Z", "2026-02-10T11:00:00Z"));
        let starts: Vec<String> = points.iter().map(|(s, _)| s.format("%H:%M").to_string()).collect();
        assert_eq!(starts, vec!["09:00", "09:15", "09:30", "09:45", "10:00", "10:15"]);
        assert!(points.iter().all(|(_, end)| *end == at("2026-02-10T11:00:00Z")));
    }

    #[test]
    fn short_gaps_around_a_booking_offer_nothing() {
        let free = interval("2026-02-10T09:00:00Z", "2026-02-10T10:00:00Z");
        let booked = [interval("2026-02-10T09:20:00Z", "2026-02-10T09:40:00Z")];

        let gaps = subtract(free, &booked);
        assert_eq!(
            gaps,
            vec![
                interval("2026-02-10T09:00:00Z", "2026-02-10T09:20:00Z"),
                interval("2026-02-10T09:40:00Z", "2026-02-10T10:00:00Z"),
            ]
        );
        assert!(gaps.into_iter().all(|gap| quantize_interval(gap).is_empty()));
    }

    #[test]
    fn start_rounds_up_and_end_rounds_down() {
        let points = quantize_interval(interval("2026-02-10T09:07:30Z", "2026-02-10T10:38:00Z"));
        let starts: Vec<DateTime<Utc>> = points.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            starts,
            vec![
                at("2026-02-10T09:15:00Z"),
                at("2026-02-10T09:30:00Z"),
                at("2026-02-10T09:45:00Z"),
            ]
        );
        assert!(points.iter().all(|(_, end)| *end == at("2026-02-10T10:30:00Z")));
    }

    #[test]
    fn start_with_leftover_seconds_never_moves_earlier() {
        assert_eq!(round_up(at("2026-02-10T09:00:30Z")), at("2026-02-10T09:15:00Z"));
        assert_eq!(round_up(at("2026-02-10T09:00:00Z")), at("2026-02-10T09:00:00Z"));
        assert_eq!(round_down(at("2026-02-10T09:59:30Z")), at("2026-02-10T09:45:00Z"));

        let points = quantize_interval(interval("2026-02-10T09:00:30Z", "2026-02-10T10:00:00Z"));
        assert_eq!(points, vec![(at("2026-02-10T09:15:00Z"), at("2026-02-10T10:00:00Z"))]);
    }

    #[test]
    fn exact_minimum_yields_a_single_start() {
        let points = quantize_interval(interval("2026-02-10T14:00:00Z", "2026-02-10T14:45:00Z"));
        assert_eq!(points, vec![(at("2026-02-10T14:00:00Z"), at("2026-02-10T14:45:00Z"))]);
    }

    #[test]
    fn rounding_can_push_an_interval_below_minimum() {
        assert!(quantize_interval(interval("2026-02-10T09:05:00Z", "2026-02-10T09:55:00Z")).is_empty());
        assert!(quantize_interval(interval("2026-02-10T09:00:00Z", "2026-02-10T09:44:00Z")).is_empty());
    }

    #[test]
    fn overlapping_bookings_only_move_the_cursor_forward() {
        let free = interval("2026-02-10T09:00:00Z", "2026-02-10T12:00:00Z");
        let booked = [
            interval("2026-02-10T10:00:00Z", "2026-02-10T11:00:00Z"),
            interval("2026-02-10T09:30:00Z", "2026-02-10T10:30:00Z"),
            interval("2026-02-10T10:15:00Z", "2026-02-10T10:45:00Z"),
        ];
        assert_eq!(
            subtract(free, &booked),
            vec![
                interval("2026-02-10T09:00:00Z", "2026-02-10T09:30:00Z"),
                interval("2026-02-10T11:00:00Z", "2026-02-10T12:00:00Z"),
            ]
        );
    }

    #[test]
    fn booking_covering_free_time_removes_it() {
        let free = interval("2026-02-10T09:00:00Z", "2026-02-10T10:00:00Z");
        let booked = [interval("2026-02-10T08:00:00Z", "2026-02-10T10:00:00Z")];
        assert!(subtract(free, &booked).is_empty());
    }

    #[test]
    fn resolved_blocks_keep_their_source_summary() {
        let normalized = normalize_events(
            &[
                entry("Free - matin", "2026-02-10T09:00:00Z", "2026-02-10T12:00:00Z"),
                entry("Walk-in", "2026-02-10T10:00:00Z", "2026-02-10T10:30:00Z"),
            ],
            "free",
        )
        .unwrap();
        assert_eq!(normalized.free.len(), 1);
        assert_eq!(normalized.booked.len(), 1);

        let resolved = resolve_overlaps(&normalized.free, &normalized.booked);
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|b: &FreeBlock| b.summary == "Free - matin"));

        let slots = quantize(&resolved);
        assert_eq!(slots.first().map(|s| s.start), Some(at("2026-02-10T09:00:00Z")));
        assert_eq!(slots.last().map(|s| s.start), Some(at("2026-02-10T11:15:00Z")));
    }

    #[test]
    fn malformed_event_dates_fail_normalization() {
        let err = normalize_events(&[entry("Free", "soon", "2026-02-10T10:00:00Z")], "free")
            .unwrap_err();
        assert!(matches!(err, IntervalError::MalformedDate { .. }));
    }

    #[test]
    fn pipeline_clips_to_window_and_sorts() {
        let entries = vec![
            entry("Free", "2026-02-11T13:00:00Z", "2026-02-11T14:00:00Z"),
            entry("Free", "2026-02-10T08:00:00Z", "2026-02-10T10:00:00Z"),
            entry("Free", "2026-02-10T08:00:00Z", "2026-02-10T10:00:00Z"),
        ];
        let window = interval("2026-02-10T08:50:00Z", "2026-03-10T00:00:00Z");

        let slots = compute_bookable_slots(&entries, "free", window).unwrap();
        let starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
        assert_eq!(
            starts,
            vec![
                at("2026-02-10T09:00:00Z"),
                at("2026-02-10T09:15:00Z"),
                at("2026-02-11T13:00:00Z"),
                at("2026-02-11T13:15:00Z"),
            ]
        );
    }

    #[test]
    fn window_starts_after_lead_time_and_caps_months() {
        let now = at("2026-02-01T12:00:00Z");
        let window = availability_window(now, Duration::hours(48), Some(6), 1).unwrap();
        assert_eq!(window.start(), at("2026-02-03T12:00:00Z"));
        assert_eq!(window.end(), at("2026-03-01T12:00:00Z"));

        let zero = availability_window(now, Duration::hours(48), Some(0), 1).unwrap();
        assert_eq!(zero.end(), window.end());
    }

    #[test]
    fn slots_are_rendered_in_local_time() {
        let slot = crate::availability::BookableSlot {
            start: at("2026-02-10T14:00:00Z"),
            end: at("2026-02-10T16:00:00Z"),
            summary: "Free".into(),
        };
        let wire = to_time_slot(&slot, Tz::America__Toronto);
        assert_eq!(wire.date.to_rfc3339(), "2026-02-10T09:00:00-05:00");
        assert_eq!(wire.end.to_rfc3339(), "2026-02-10T11:00:00-05:00");
    }

    #[tokio::test(start_paused = true)]
    async fn availability_retries_transient_failures() {
        let calendar = InMemoryCalendar::new();
        calendar.seed("primary", "Free", "2026-02-10T09:00:00-05:00", "2026-02-10T10:00:00-05:00");
        calendar.fail_next(Operation::List, 2);

        let slots = get_availability(&calendar, &settings(), at("2026-02-07T00:00:00Z"), None)
            .await
            .unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(calendar.call_count(Operation::List), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn availability_gives_up_after_three_attempts() {
        let calendar = InMemoryCalendar::new();
        calendar.fail_next(Operation::List, 3);

        let err = get_availability(&calendar, &settings(), at("2026-02-07T00:00:00Z"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, GcalError::Transient(_)));
        assert_eq!(calendar.call_count(Operation::List), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calendar_times_out_as_retryable() {
        let calendar = InMemoryCalendar::new();
        calendar.set_latency(std::time::Duration::from_secs(30));

        let err = get_availability(&calendar, &settings(), at("2026-02-07T00:00:00Z"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, GcalError::Timeout(_)));
        assert!(err.is_retryable());
    }
}
