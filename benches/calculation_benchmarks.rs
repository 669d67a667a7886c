//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers the hot paths of a pay run:
//! - Salary proration over ranges of one to twenty-four months
//! - Ledger hour aggregation for one employee among many
//! - Encoding and decoding the time-record file
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::attendance::AttendanceLedger;
use payroll_engine::calculation::prorate_salary;
use payroll_engine::clock::FixedClock;
use payroll_engine::config::AttendanceConfig;
use payroll_engine::models::TimeRecord;
use payroll_engine::storage::{RecordCodec, TimeRecordLineCodec};

fn start_of_2024() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-01 08:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Builds closed 8-hour shifts, one per day, cycling through `employees`.
fn create_records(count: usize, employees: usize) -> Vec<TimeRecord> {
    (0..count)
        .map(|n| {
            let clock_in = start_of_2024() + Duration::days((n / employees) as i64);
            TimeRecord::restore(
                format!("TR{:04}", n + 1),
                format!("E-{}", n % employees),
                clock_in,
                Some(clock_in + Duration::hours(8)),
                "",
            )
        })
        .collect()
}

fn bench_proration(c: &mut Criterion) {
    let mut group = c.benchmark_group("proration");
    let salary = Decimal::new(310_000, 2);
    let start = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

    for months in [1u32, 3, 12, 24] {
        let end = start
            .checked_add_months(chrono::Months::new(months))
            .unwrap()
            .pred_opt()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("months", months), &end, |b, end| {
            b.iter(|| prorate_salary(black_box(salary), black_box(start), black_box(*end)).unwrap())
        });
    }

    group.finish();
}

fn bench_total_hours(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_total_hours");
    let clock = Arc::new(FixedClock::new(start_of_2024()));

    for count in [1_000usize, 10_000, 100_000] {
        let ledger =
            AttendanceLedger::from_records(create_records(count, 50), clock.clone(), AttendanceConfig::default())
                .unwrap();
        let window_end = start_of_2024() + Duration::days(31);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("records", count), &ledger, |b, ledger| {
            b.iter(|| ledger.total_hours(black_box("E-7"), start_of_2024(), window_end))
        });
    }

    group.finish();
}

fn bench_time_record_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_record_codec");
    let records = create_records(10_000, 50);
    let text = TimeRecordLineCodec.encode(&records).unwrap();

    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("encode_10000", |b| {
        b.iter(|| TimeRecordLineCodec.encode(black_box(&records)).unwrap())
    });
    group.bench_function("decode_10000", |b| {
        b.iter(|| {
            TimeRecordLineCodec
                .decode("bench", black_box(&text))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_proration,
    bench_total_hours,
    bench_time_record_codec
);
criterion_main!(benches);
