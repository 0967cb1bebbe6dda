use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ipspan_core::Uint128;

fn benchmark_decimal(c: &mut Criterion) {
    let max = "340282366920938463463374607431768211455";

    c.bench_function("uint128_parse_max", |b| {
        b.iter(|| Uint128::from_decimal_str(black_box(max)))
    });

    c.bench_function("uint128_format_max", |b| {
        b.iter(|| black_box(Uint128::MAX).to_decimal_string())
    });

    c.bench_function("uint128_format_ipv4", |b| {
        // 192.168.0.1
        b.iter(|| black_box(Uint128::from(0xc0a8_0001u64)).to_decimal_string())
    });
}

criterion_group!(benches, benchmark_decimal);
criterion_main!(benches);
