//! Performance benchmarks for the extraction pipeline.
//!
//! Measures the reconcile-and-normalize path for growing line item tables
//! served by the in-memory executor.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::hint::black_box;

use chrono::{Duration, NaiveDate};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rust_decimal::Decimal;

use erp_expense_extractor::extraction::{Extractor, HeaderLookup, reconcile, strip_leading_zeros};
use erp_expense_extractor::models::{ExtractionRequest, HeaderRecord, LineItemRecord};
use erp_expense_extractor::remote::StaticExecutor;

const COST_CENTERS: [&str; 4] = ["0000001000", "0000002000", "0000003000", "0000004000"];

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Builds `documents` headers with five line items each; every tenth
/// document has no header.
fn create_documents(documents: usize) -> (Vec<HeaderRecord>, Vec<LineItemRecord>) {
    let mut headers = Vec::with_capacity(documents);
    let mut line_items = Vec::with_capacity(documents * 5);

    for doc in 0..documents {
        let document_number = format!("{:010}", doc + 1);
        if doc % 10 != 9 {
            headers.push(HeaderRecord {
                document_number: document_number.clone(),
                posting_date: start_date() + Duration::days((doc % 28) as i64),
                document_currency: "EUR".to_string(),
            });
        }
        for item in 0..5 {
            line_items.push(LineItemRecord {
                document_number: document_number.clone(),
                cost_center: COST_CENTERS[(doc + item) % COST_CENTERS.len()].to_string(),
                cost_element: format!("{:010}", 400000 + item),
                person_number: format!("{:08}", doc % 500),
                order_id: String::new(),
                segment_text: format!("Line {}", item),
                value_in_company_currency: Decimal::new((doc * 100 + item) as i64, 2),
            });
        }
    }

    (headers, line_items)
}

fn bench_strip_leading_zeros(c: &mut Criterion) {
    c.bench_function("strip_leading_zeros", |b| {
        b.iter(|| strip_leading_zeros(black_box("0000001000")))
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");

    for documents in [100usize, 1_000, 10_000] {
        let (headers, line_items) = create_documents(documents);
        group.throughput(Throughput::Elements(line_items.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(documents),
            &(headers, line_items),
            |b, (headers, line_items)| {
                b.iter(|| {
                    let lookup = HeaderLookup::build(headers.iter().cloned());
                    let result = reconcile(&lookup, line_items.iter().cloned());
                    black_box(result.orphan_count())
                })
            },
        );
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    let request = ExtractionRequest::new(
        "1000",
        start_date(),
        start_date() + Duration::days(30),
        None,
        COST_CENTERS,
    )
    .unwrap();

    for documents in [100usize, 1_000] {
        let (headers, line_items) = create_documents(documents);
        let executor = StaticExecutor::with_documents(COST_CENTERS, &headers, &line_items);

        group.throughput(Throughput::Elements(line_items.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(documents),
            &request,
            |b, request| {
                b.iter(|| {
                    let outcome = Extractor::new(&executor).extract(black_box(request));
                    black_box(outcome.map(|o| o.expenses.len()).unwrap_or_default())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_strip_leading_zeros,
    bench_reconcile,
    bench_extract
);
criterion_main!(benches);
