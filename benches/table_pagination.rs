//! Table pagination benchmarks
//!
//! Measures laying out long tables across pages, with and without repeated headers,
//! and the cost of writing the result to PDF.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tabula::{Cell, DocumentConfig, DocumentRenderer, Table};

fn body_table(rows: usize, with_header: bool) -> Table {
    let mut table = Table::new(vec![2.0, 1.0, 1.0]).expect("valid columns");
    if with_header {
        let mut header = Table::with_equal_columns(3).expect("valid columns");
        for title in ["Item", "Quantity", "Amount"] {
            header
                .add_cell(Cell::new().with_block(14.0).with_label(title))
                .expect("header cell");
        }
        table = table.with_header(header).expect("matching header");
    }
    let mut covered = false;
    for row in 0..rows {
        table
            .add_cell(Cell::new().with_lines(10.0, 1 + row % 3).with_label(format!("Item {row}")))
            .expect("cell");
        if !covered {
            // Every fifth row starts a quantity cell spanning two rows.
            let span = if row % 5 == 0 && row + 1 < rows { 2 } else { 1 };
            table
                .add_cell(Cell::new().with_span(span, 1).with_block(10.0))
                .expect("cell");
            covered = span == 2;
        } else {
            covered = false;
        }
        table.add_cell(Cell::new().with_block(10.0)).expect("cell");
    }
    table
}

fn benchmark_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate");
    for row_count in [10, 100, 1000] {
        for with_header in [false, true] {
            let name = if with_header { "with_header" } else { "plain" };
            let table = body_table(row_count, with_header);
            group.bench_with_input(BenchmarkId::new(name, row_count), &table, |b, table| {
                b.iter(|| {
                    let mut document = DocumentRenderer::new(DocumentConfig::default());
                    document
                        .add_table(black_box(table.clone()))
                        .expect("Failed to lay out table");
                    document.page_count()
                });
            });
        }
    }
    group.finish();
}

fn benchmark_write_pdf(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_pdf");
    for row_count in [10, 100, 1000] {
        let mut document = DocumentRenderer::new(DocumentConfig::default());
        document
            .add_table(body_table(row_count, true))
            .expect("Failed to lay out table");
        group.bench_with_input(BenchmarkId::new("rows", row_count), &document, |b, document| {
            b.iter(|| document.to_bytes().expect("Failed to write PDF"));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_paginate, benchmark_write_pdf);
criterion_main!(benches);
