// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuoteIntake-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Quote Intake and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quote_intake::reconcile::{reconcile_at, reconcile_with_report};

mod fixtures;

// Benchmark identity (keep stable):
// - Group name in this file: `reconcile`
// - Case IDs must remain stable so results stay comparable over time.
fn benches_reconcile(c: &mut Criterion) {
    let now = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");

    let cases = [
        ("v1_small", fixtures::v1_document(1)),
        ("v1_full", fixtures::v1_document(10)),
        ("v2_small", fixtures::v2_document(1)),
        ("v2_full", fixtures::v2_document(10)),
        ("v3_full", fixtures::v3_document(10)),
        ("null", serde_json::Value::Null),
    ];

    let mut group = c.benchmark_group("reconcile");
    for (case_id, document) in &cases {
        group.bench_function(*case_id, |b| {
            b.iter(|| reconcile_at(black_box(document), now));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("reconcile.report");
    let document = fixtures::v2_document(10);
    group.bench_function("v2_full", |b| {
        b.iter(|| {
            let (_, report) = reconcile_with_report(black_box(&document), now);
            report.migrations.len()
        });
    });
    group.finish();
}

criterion_group!(benches, benches_reconcile);
criterion_main!(benches);
