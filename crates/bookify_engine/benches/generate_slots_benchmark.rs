use bookify_engine::models::{Buffer, BusyInterval, BusySource, OperatingWindow, TimeInterval};
use bookify_engine::slots::generate_slots;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 5).unwrap()
}

fn bench_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()
}

fn wide_window() -> OperatingWindow {
    OperatingWindow::new(
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    )
}

// Helper function to fill the day with evenly spaced busy periods
fn create_busy_periods(count: usize, duration_minutes: i64) -> Vec<BusyInterval> {
    let tz = Tz::Europe__Warsaw;
    let day_start = tz
        .with_ymd_and_hms(2025, 5, 5, 8, 0, 0)
        .unwrap()
        .with_timezone(&Utc);

    let mut busy = Vec::with_capacity(count);
    let mut current = day_start;
    for _ in 0..count {
        let start = current + Duration::minutes(30);
        let end = start + Duration::minutes(duration_minutes.max(1));
        busy.push(BusyInterval {
            interval: TimeInterval::new(start, end).unwrap(),
            source: BusySource::Booking,
            reason: None,
            is_full_day: false,
        });
        current = end;
    }
    busy
}

fn benchmark_generate_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_slots");
    let tz = Tz::Europe__Warsaw;

    group.bench_function("no_busy_periods", |b| {
        b.iter(|| {
            generate_slots(
                black_box(bench_date()),
                black_box(tz),
                black_box(&wide_window()),
                black_box(60),
                black_box(&[]),
                black_box(&Buffer::none()),
                black_box(30),
                black_box(bench_now()),
            )
        })
    });

    group.bench_function("few_busy_periods", |b| {
        let busy = create_busy_periods(5, 45);
        b.iter(|| {
            generate_slots(
                black_box(bench_date()),
                black_box(tz),
                black_box(&wide_window()),
                black_box(60),
                black_box(&busy),
                black_box(&Buffer::none()),
                black_box(30),
                black_box(bench_now()),
            )
        })
    });

    group.bench_function("many_busy_periods", |b| {
        let busy = create_busy_periods(20, 15);
        b.iter(|| {
            generate_slots(
                black_box(bench_date()),
                black_box(tz),
                black_box(&wide_window()),
                black_box(60),
                black_box(&busy),
                black_box(&Buffer::none()),
                black_box(30),
                black_box(bench_now()),
            )
        })
    });

    group.bench_function("with_buffer", |b| {
        let busy = create_busy_periods(5, 45);
        let buffer = Buffer::new(15, 15);
        b.iter(|| {
            generate_slots(
                black_box(bench_date()),
                black_box(tz),
                black_box(&wide_window()),
                black_box(60),
                black_box(&busy),
                black_box(&buffer),
                black_box(30),
                black_box(bench_now()),
            )
        })
    });

    group.bench_function("short_service_fine_step", |b| {
        let busy = create_busy_periods(5, 45);
        b.iter(|| {
            generate_slots(
                black_box(bench_date()),
                black_box(tz),
                black_box(&wide_window()),
                black_box(15),
                black_box(&busy),
                black_box(&Buffer::none()),
                black_box(30),
                black_box(bench_now()),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_generate_slots);
criterion_main!(benches);
