//! Criterion benchmarks for busdate_core.
//!
//! Covers serial conversion, period parsing, business-day stepping and
//! compound expression evaluation.

use busdate_core::calendar::{target_days, Holidays, NoHolidays, TargetCalendar};
use busdate_core::types::{Date, FixedClock, Period, SerialDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark (y, m, d) <-> serial conversion.
fn bench_serial_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("serial_conversion");

    group.bench_function("from_ymd", |b| {
        b.iter(|| SerialDate::from_ymd(black_box(2016), black_box(2), black_box(29)).unwrap());
    });

    let serial = SerialDate::from_ymd(2016, 2, 29).unwrap();
    group.bench_function("to_ymd", |b| {
        b.iter(|| black_box(serial).to_ymd());
    });

    group.finish();
}

/// Benchmark period parsing for short and long forms.
fn bench_period_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("period_parse");

    for text in ["3M", "1Y6M", "-1Y6M2B", "10 years 3 months"] {
        group.bench_with_input(BenchmarkId::from_parameter(text), &text, |b, text| {
            b.iter(|| Period::parse(black_box(text)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark business-day stepping on different calendars.
fn bench_business_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_business_days");
    let start = Date::from_ymd(2015, 12, 1).unwrap();
    let holidays = (2015..2020).fold(Holidays::default(), |acc, y| acc.union(&target_days(y)));

    for n in [2, 20, 250] {
        group.bench_with_input(BenchmarkId::new("weekend_only", n), &n, |b, &n| {
            b.iter(|| black_box(start).add_business_days(n, &NoHolidays));
        });
        group.bench_with_input(BenchmarkId::new("target_rule", n), &n, |b, &n| {
            b.iter(|| black_box(start).add_business_days(n, &TargetCalendar));
        });
        group.bench_with_input(BenchmarkId::new("holiday_set", n), &n, |b, &n| {
            b.iter(|| black_box(start).add_business_days(n, &holidays));
        });
    }

    group.finish();
}

/// Benchmark compound expression evaluation.
fn bench_compound(c: &mut Criterion) {
    let clock = FixedClock::new(Date::from_ymd(2016, 1, 1).unwrap());
    c.bench_function("parse_expr", |b| {
        b.iter(|| {
            Date::parse_expr(black_box("0B3D0BMODFOLLOW20171231"), &clock, &TargetCalendar).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_serial_conversion,
    bench_period_parse,
    bench_business_days,
    bench_compound
);
criterion_main!(benches);
