//! Benchmarks for abibridge struct conversion

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;

use abibridge_core::{Direction, Side};
use abibridge_layout::Transcribe;
use abibridge_sdk::{default_registry, GAMESERVERITEM_102, SERVERNETADR_102, USER_STATS_RECEIVED_12};
use abibridge_test::random_buffer;

fn bench_registry_build(c: &mut Criterion) {
    c.bench_function("registry_build", |b| {
        b.iter(|| black_box(default_registry().unwrap()))
    });
}

fn bench_server_item(c: &mut Criterion) {
    let registry = default_registry().unwrap();
    let pair = registry.pair(GAMESERVERITEM_102.key).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let foreign = random_buffer(pair.layout(Side::Foreign), 0, &mut rng);
    let native = random_buffer(pair.layout(Side::Native), 0, &mut rng);
    let mut foreign_out = vec![0u8; pair.foreign_size()];
    let mut native_out = vec![0u8; pair.native_size()];

    let mut group = c.benchmark_group("gameserveritem_t");
    group.throughput(Throughput::Bytes(pair.foreign_size() as u64));

    group.bench_function("foreign_to_native", |b| {
        b.iter(|| {
            pair.foreign_to_native(black_box(&foreign), &mut native_out)
                .unwrap()
        })
    });

    group.bench_function("native_to_foreign", |b| {
        b.iter(|| {
            pair.native_to_foreign(black_box(&native), &mut foreign_out)
                .unwrap()
        })
    });

    group.bench_function("raw_foreign_to_native", |b| {
        b.iter(|| unsafe {
            pair.convert_raw(
                Direction::ForeignToNative,
                black_box(foreign.as_ptr()),
                native_out.as_mut_ptr(),
            )
        })
    });

    group.finish();
}

fn bench_lookup_and_convert(c: &mut Criterion) {
    let registry = default_registry().unwrap();
    let src = [0x11u8; 16];
    let mut dst = [0u8; 16];

    c.bench_function("lookup_servernetadr", |b| {
        b.iter(|| {
            let t = registry
                .lookup(
                    black_box(SERVERNETADR_102.key.name),
                    102,
                    Direction::ForeignToNative,
                )
                .unwrap();
            t.transcribe(&src[..8], &mut dst[..8]).unwrap()
        })
    });

    c.bench_function("user_stats_callback", |b| {
        let t = registry
            .transcriber(USER_STATS_RECEIVED_12.key, Direction::NativeToForeign)
            .unwrap();
        b.iter(|| t.transcribe(black_box(&src), &mut dst).unwrap())
    });
}

criterion_group!(
    benches,
    bench_registry_build,
    bench_server_item,
    bench_lookup_and_convert
);
criterion_main!(benches);
