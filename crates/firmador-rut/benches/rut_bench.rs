// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Firmador contributors
// Criterion benchmarks for RUT cleaning, check-digit computation, and
// formatting. These run on every keystroke in the calling input layer, so
// the interesting number is single-call latency on realistic input.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_compute_dv(c: &mut Criterion) {
    c.bench_function("compute_dv (8-digit body)", |b| {
        b.iter(|| firmador_rut::compute_dv(black_box("12345678")));
    });
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("format (punctuated input)", |b| {
        b.iter(|| firmador_rut::format(black_box("12.345.678-5")));
    });
}

fn bench_validate(c: &mut Criterion) {
    c.bench_function("validate (punctuated input)", |b| {
        b.iter(|| firmador_rut::validate(black_box("12.345.678-5")));
    });
}

criterion_group!(benches, bench_compute_dv, bench_format, bench_validate);
criterion_main!(benches);
