#[cfg(test)]
mod tests {
    use crate::availability::{
        quantize_interval, round_up, subtract, MIN_SLOT_DURATION_MINUTES,
        SLOT_GRANULARITY_MINUTES,
    };
    use crate::interval::Interval;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap()
    }

    fn span(start_min: i64, len_min: i64) -> Interval {
        let start = base() + Duration::minutes(start_min);
        Interval::new(start, start + Duration::minutes(len_min)).unwrap()
    }

    /// Disjoint free intervals laid out left to right.
    fn free_layout() -> impl Strategy<Value = Vec<Interval>> {
        proptest::collection::vec((0i64..120, 1i64..240), 1..6).prop_map(|parts| {
            let mut cursor = 0;
            parts
                .into_iter()
                .map(|(gap, len)| {
                    let interval = span(cursor + gap, len);
                    cursor += gap + len;
                    interval
                })
                .collect()
        })
    }

    fn booked_layout() -> impl Strategy<Value = Vec<Interval>> {
        proptest::collection::vec((0i64..1800, 1i64..180), 0..8)
            .prop_map(|parts| parts.into_iter().map(|(s, l)| span(s, l)).collect())
    }

    fn covers(intervals: &[Interval], t: DateTime<Utc>) -> bool {
        intervals.iter().any(|i| i.contains_instant(t))
    }

    proptest! {
        #[test]
        fn resolved_intervals_never_overlap(free in free_layout(), booked in booked_layout()) {
            let resolved: Vec<Interval> = free.iter().flat_map(|f| subtract(*f, &booked)).collect();
            for (i, a) in resolved.iter().enumerate() {
                for b in resolved.iter().skip(i + 1) {
                    prop_assert!(a.end() <= b.start() || b.end() <= a.start());
                }
                prop_assert!(!booked.iter().any(|busy| busy.overlaps(a)));
            }
        }

        #[test]
        fn resolved_plus_booked_covers_free_time(free in free_layout(), booked in booked_layout()) {
            let resolved: Vec<Interval> = free.iter().flat_map(|f| subtract(*f, &booked)).collect();
            for minute in 0..2200 {
                let t = base() + Duration::minutes(minute);
                let in_free = covers(&free, t);
                let in_resolved = covers(&resolved, t);
                let in_booked = covers(&booked, t);
                prop_assert_eq!(in_free, in_resolved || (in_free && in_booked));
                if in_resolved {
                    prop_assert!(in_free && !in_booked);
                }
            }
        }

        #[test]
        fn quantized_slots_respect_minimum_and_granularity(
            start_sec in 0i64..86_400,
            len_sec in 1i64..28_800,
        ) {
            let start = base() + Duration::seconds(start_sec);
            let interval = Interval::new(start, start + Duration::seconds(len_sec)).unwrap();
            let rounded_start = round_up(interval.start());

            for (slot_start, slot_end) in quantize_interval(interval) {
                prop_assert!(slot_end - slot_start >= Duration::minutes(MIN_SLOT_DURATION_MINUTES));
                let offset = (slot_start - rounded_start).num_minutes();
                prop_assert!(offset >= 0);
                prop_assert!(slot_start >= interval.start());
                prop_assert_eq!(offset % SLOT_GRANULARITY_MINUTES, 0);
                prop_assert!(slot_end <= interval.end());
            }
        }
    }
}
