use criterion::{Criterion, criterion_group, criterion_main};
use tlvdiff_codec::DerCodec;
use tlvdiff_harness::{HarnessConfig, RoundTripHarness};

fn bench_reference_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("harness");
    group.sample_size(20);

    group.bench_function("reference_run", |b| {
        b.iter(|| {
            let mut harness = RoundTripHarness::new(HarnessConfig::default(), DerCodec::new());
            harness.run(&mut std::io::sink()).unwrap()
        });
    });

    group.bench_function("iterate_1000", |b| {
        b.iter(|| {
            let config = HarnessConfig::default().with_iterations(1000);
            let mut harness = RoundTripHarness::new(config, DerCodec::new());
            (0..1000).filter(|_| harness.iterate().outcome.is_divergence()).count()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_reference_run);
criterion_main!(benches);
