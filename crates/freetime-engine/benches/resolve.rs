use std::hint::black_box;

use chrono::{Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use freetime_engine::{
    normalize_events, resolve, BusyEvent, RawBusyEvent, ResolveOptions, WeeklyTemplate,
};

/// `per_day` half-hour meetings every day of the week starting Monday 2026-03-16.
fn dense_week(per_day: i64) -> Vec<BusyEvent> {
    let monday = NaiveDate::from_ymd_opt(2026, 3, 16)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();
    (0..7)
        .flat_map(|day| {
            (0..per_day).map(move |n| {
                let start = monday + Duration::days(day) + Duration::minutes(n * 45);
                BusyEvent {
                    start,
                    end: start + Duration::minutes(30),
                }
            })
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let template = WeeklyTemplate::uniform(
        NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    )
    .unwrap();
    let options = ResolveOptions::default();
    let now = NaiveDate::from_ymd_opt(2026, 3, 16)
        .unwrap()
        .and_hms_opt(10, 3, 0)
        .unwrap();

    for per_day in [0, 4, 20] {
        let events = dense_week(per_day);
        group.bench_with_input(
            BenchmarkId::new("week", per_day * 7),
            &events,
            |b, events| {
                b.iter(|| resolve(black_box(7), &template, black_box(events), now, &options));
            },
        );
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let raw: Vec<RawBusyEvent> = dense_week(20)
        .iter()
        .map(|e| {
            RawBusyEvent::new(
                &format!("{}Z", e.start.format("%Y-%m-%dT%H:%M:%S")),
                &format!("{}Z", e.end.format("%Y-%m-%dT%H:%M:%S")),
            )
        })
        .collect();
    let tz: Tz = "Europe/Berlin".parse().unwrap();

    c.bench_function("normalize_140_events", |b| {
        b.iter(|| normalize_events(black_box(&raw), tz));
    });
}

criterion_group!(benches, bench_resolve, bench_normalize);
criterion_main!(benches);
