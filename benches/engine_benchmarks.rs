//! Performance benchmarks for the Travel Advance Engine.
//!
//! This benchmark suite verifies that the engine meets performance targets:
//! - Single line derivation: < 10μs mean
//! - Claim recompute with 50 lines: < 500μs mean
//! - Settlement reconciliation: < 10μs mean
//! - Claim creation over HTTP: < 1ms mean
//! - Batch of 100 claim creations: < 100ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use std::str::FromStr;

use advance_engine::advance::reconcile;
use advance_engine::api::{AppState, create_router};
use advance_engine::calculation::derive_line;
use advance_engine::claims::recompute_totals;
use advance_engine::config::{ConfigLoader, FinanceConfig};
use advance_engine::models::{Currency, ExpenseCategory, ExpenseLine};

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use tower::ServiceExt;

/// Creates a test state with loaded configuration.
fn create_test_state() -> AppState {
    let loader = ConfigLoader::load("./config/finance").expect("Failed to load config");
    AppState::new(loader)
}

fn load_config() -> FinanceConfig {
    ConfigLoader::load("./config/finance")
        .expect("Failed to load config")
        .config()
        .clone()
}

/// Creates an expense line cycling through categories and currencies.
fn create_line(i: usize) -> ExpenseLine {
    let categories = [
        ExpenseCategory::Travel,
        ExpenseCategory::Meals,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Taxi,
        ExpenseCategory::Fuel,
        ExpenseCategory::Misc,
    ];
    let currencies = [Currency::SAR, Currency::USD, Currency::EUR, Currency::AED];
    let currency = currencies[i % currencies.len()];
    ExpenseLine {
        expense_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        category: categories[i % categories.len()],
        vendor: format!("Vendor {}", i),
        description: String::new(),
        currency,
        amount: Decimal::from(50 + (i as i64 % 200)),
        vat_included: currency == Currency::SAR && i % 5 == 0,
        receipt_url: None,
    }
}

fn create_claim_body(line_count: usize) -> String {
    let lines: Vec<serde_json::Value> = (0..line_count)
        .map(|i| {
            serde_json::json!({
                "expense_date": "2026-03-02",
                "category": "meals",
                "vendor": format!("Vendor {}", i),
                "currency": "SAR",
                "amount": format!("{}", 50 + (i % 200))
            })
        })
        .collect();

    serde_json::json!({
        "employee_id": "emp_bench_001",
        "claim_date": "2026-03-08",
        "description": "Benchmark claim",
        "lines": lines
    })
    .to_string()
}

/// Benchmark: Single line derivation (conversion + VAT + policy).
///
/// Target: < 10μs mean
fn bench_line_derivation(c: &mut Criterion) {
    let config = load_config();
    let line = create_line(0);

    c.bench_function("line_derivation", |b| {
        b.iter(|| black_box(derive_line(black_box(&line), &config)))
    });
}

/// Benchmark: Claim total recompute at various line counts.
fn bench_claim_recompute(c: &mut Criterion) {
    let config = load_config();

    let mut group = c.benchmark_group("claim_recompute");

    for line_count in [1, 5, 10, 25, 50].iter() {
        let lines: Vec<ExpenseLine> = (0..*line_count).map(create_line).collect();

        group.throughput(Throughput::Elements(*line_count as u64));
        group.bench_with_input(BenchmarkId::new("lines", line_count), line_count, |b, _| {
            b.iter(|| black_box(recompute_totals(black_box(&lines), &config)))
        });
    }

    group.finish();
}

/// Benchmark: Settlement reconciliation.
///
/// Target: < 10μs mean
fn bench_settlement_reconcile(c: &mut Criterion) {
    let advanced = Decimal::from_str("5000").unwrap();
    let actual = Decimal::from_str("4213.37").unwrap();

    c.bench_function("settlement_reconcile", |b| {
        b.iter(|| black_box(reconcile(black_box(advanced), black_box(actual))))
    });
}

/// Benchmark: Claim creation over HTTP with 10 lines.
///
/// Target: < 1ms mean
fn bench_claim_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();
    let router = create_router(state);
    let body = create_claim_body(10);

    c.bench_function("claim_endpoint_10_lines", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/claims")
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

/// Benchmark: Batch of 100 claim creations.
///
/// Target: < 100ms mean
fn bench_claim_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = create_test_state();

    // Pre-create 100 different claim bodies with varying line counts
    let bodies: Vec<String> = (0..100).map(|i| create_claim_body(1 + i % 5)).collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("claim_batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &bodies {
                let router = create_router(state.clone());
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/claims")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body.clone()))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_line_derivation,
    bench_claim_recompute,
    bench_settlement_reconcile,
    bench_claim_endpoint,
    bench_claim_batch_100,
);
criterion_main!(benches);
