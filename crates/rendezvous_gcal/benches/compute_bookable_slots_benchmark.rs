use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rendezvous_common::services::{CalendarEntry, Transparency};
use rendezvous_gcal::availability::compute_bookable_slots;
use rendezvous_gcal::interval::Interval;

// One free working day per calendar day, with `booked_per_day` half hour
// appointments spread across it.
fn month_of_events(booked_per_day: i64) -> (Vec<CalendarEntry>, Interval) {
    let origin = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
    let mut entries = Vec::new();

    for day in 0..30 {
        let nine = origin + Duration::days(day) + Duration::hours(14);
        let five = nine + Duration::hours(8);
        entries.push(entry(format!("free-{day}"), "Free", nine, five));

        for n in 0..booked_per_day {
            let start = nine + Duration::minutes(25 + n * 95);
            if start + Duration::minutes(30) > five {
                break;
            }
            entries.push(entry(
                format!("booked-{day}-{n}"),
                "Massage - Client",
                start,
                start + Duration::minutes(30),
            ));
        }
    }

    let window = Interval::new(origin, origin + Duration::days(30)).unwrap();
    (entries, window)
}

fn entry(
    event_id: String,
    summary: &str,
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
) -> CalendarEntry {
    CalendarEntry {
        event_id,
        summary: summary.to_string(),
        description: None,
        start_time: start.to_rfc3339(),
        end_time: end.to_rfc3339(),
        transparency: Transparency::Opaque,
        reference: None,
    }
}

fn benchmark_compute_bookable_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_bookable_slots");

    for booked_per_day in [0, 2, 5] {
        let (entries, window) = month_of_events(booked_per_day);
        group.bench_with_input(
            BenchmarkId::new("month", booked_per_day),
            &entries,
            |b, entries| {
                b.iter(|| compute_bookable_slots(black_box(entries), black_box("free"), window))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_compute_bookable_slots);
criterion_main!(benches);
