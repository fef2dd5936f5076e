//! Performance benchmarks for the payroll engine.
//!
//! This benchmark suite covers:
//! - A single statement through the pure pipeline
//! - A single-employee run through the HTTP router
//! - Batches of 100 and 1000 employees through the orchestrator
//! - Scaling of batch time with batch size
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::{ConfigLoader, ConfigStore, PayrollConfig};
use payroll_engine::models::{
    EmployeeRecord, EmployeeWageProfile, PayrollPeriod, Periodicity, RunType, WageZone,
};
use payroll_engine::orchestrator::{EmployeeSelection, PayrollOrchestrator, compute_statement};
use payroll_engine::repository::{
    InMemoryEmployeeRepository, InMemoryPeriodRepository, InMemoryStatementRepository,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

const PERIOD_ID: &str = "2025-12-A";

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn load_config() -> PayrollConfig {
    ConfigLoader::load("./config/payroll")
        .expect("Failed to load config")
        .into_config()
}

fn create_period() -> PayrollPeriod {
    PayrollPeriod {
        id: PERIOD_ID.to_string(),
        periodicity: Periodicity::SemiMonthly,
        start_date: date("2025-06-01"),
        end_date: date("2025-06-15"),
        payment_date: date("2025-06-15"),
    }
}

/// Creates `count` employees with wages spread across the tax brackets.
fn create_employees(count: usize) -> Vec<EmployeeRecord> {
    (0..count)
        .map(|i| {
            let daily_wage = Decimal::from(150 + (i % 40) * 50);
            EmployeeRecord {
                employee_id: format!("emp_{:04}", i),
                profile: EmployeeWageProfile {
                    daily_wage,
                    integrated_daily_wage: daily_wage * Decimal::new(10452, 4),
                    periodicity: Periodicity::SemiMonthly,
                    hire_date: date("2020-01-01"),
                    wage_zone: WageZone::General,
                },
                agreements: vec![],
                absence_days: Decimal::from(i % 3),
                vacation_days_taken: Decimal::ZERO,
                termination: None,
            }
        })
        .collect()
}

fn create_orchestrator(count: usize) -> PayrollOrchestrator {
    PayrollOrchestrator::new(
        Arc::new(ConfigStore::new(load_config())),
        Arc::new(InMemoryEmployeeRepository::new(create_employees(count))),
        Arc::new(InMemoryPeriodRepository::new(vec![create_period()])),
        Arc::new(InMemoryStatementRepository::new()),
    )
}

/// Benchmark: One statement through the pure pipeline.
///
/// Target: < 100μs mean
fn bench_single_statement(c: &mut Criterion) {
    let config = load_config();
    let period = create_period();
    let record = create_employees(1).remove(0);

    c.bench_function("single_statement", |b| {
        b.iter(|| {
            black_box(compute_statement(
                black_box(&config),
                &period,
                RunType::Ordinary,
                black_box(&record),
            ))
        })
    });
}

/// Benchmark: One-employee run through the router.
///
/// Target: < 1ms mean
fn bench_single_run_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(create_orchestrator(1)));
    let body = serde_json::json!({
        "period_id": PERIOD_ID,
        "run_type": "ordinary",
        "employees": ["emp_0000"]
    })
    .to_string();

    c.bench_function("single_run_request", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/runs")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: Batch of 100 employees.
///
/// Target: < 20ms mean
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let orchestrator = create_orchestrator(100);

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(
                orchestrator
                    .invoke(PERIOD_ID, RunType::Ordinary, EmployeeSelection::All)
                    .await,
            )
        })
    });

    group.finish();
}

/// Benchmark: Batch of 1000 employees.
///
/// Target: < 200ms mean
fn bench_batch_1000(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let orchestrator = create_orchestrator(1000);

    let mut group = c.benchmark_group("large_batch_processing");
    group.throughput(Throughput::Elements(1000));
    // Reduce sample size for large batches to keep benchmark time reasonable
    group.sample_size(10);

    group.bench_function("batch_1000", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(
                orchestrator
                    .invoke(PERIOD_ID, RunType::Ordinary, EmployeeSelection::All)
                    .await,
            )
        })
    });

    group.finish();
}

/// Benchmark: Various batch sizes to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("scaling");

    for employee_count in [1, 10, 50, 250].iter() {
        let orchestrator = create_orchestrator(*employee_count);

        group.throughput(Throughput::Elements(*employee_count as u64));
        group.bench_with_input(
            BenchmarkId::new("employees", employee_count),
            employee_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    black_box(
                        orchestrator
                            .invoke(PERIOD_ID, RunType::Ordinary, EmployeeSelection::All)
                            .await,
                    )
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_statement,
    bench_single_run_request,
    bench_batch_100,
    bench_batch_1000,
    bench_scaling,
);
criterion_main!(benches);
