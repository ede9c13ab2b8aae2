use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use plexgen_core::RngHandle;
use plexgen_models::{
    generate_configuration_model, generate_multiplex_configuration_model, DegreeSequence,
    RewirePolicy,
};
use plexgen_net::{Coupling, MonoplexNetwork};

fn power_law_like(nodes: usize) -> DegreeSequence {
    let mut degs = DegreeSequence::new()
        .with(1, nodes / 2)
        .with(2, nodes / 4)
        .with(4, nodes / 8)
        .with(8, nodes / 16)
        .with(16, nodes / 16);
    if degs.stub_count() % 2 == 1 {
        degs = degs.with(1, 1);
    }
    degs
}

fn conf_model_bench(c: &mut Criterion) {
    let policy = RewirePolicy::default();
    let mut group = c.benchmark_group("configuration_model");
    for nodes in [256usize, 1_024, 4_096] {
        let degs = power_law_like(nodes);
        group.bench_with_input(BenchmarkId::from_parameter(nodes), &degs, |b, degs| {
            let mut rng = RngHandle::from_seed(0xC0FFEE);
            b.iter(|| {
                let mut net = MonoplexNetwork::new();
                black_box(generate_configuration_model(&mut net, degs, &policy, &mut rng).unwrap())
            });
        });
    }
    group.finish();

    let layers = vec![
        DegreeSequence::new().with(3, 1_000),
        DegreeSequence::new().with(2, 500).with(4, 500),
        DegreeSequence::new().with(1, 800).with(6, 200),
    ];
    c.bench_function("multiplex_three_layers", |b| {
        let mut rng = RngHandle::from_seed(7);
        b.iter(|| {
            black_box(
                generate_multiplex_configuration_model(
                    &layers,
                    Coupling::default(),
                    &policy,
                    &mut rng,
                )
                .unwrap(),
            )
        });
    });
}

criterion_group!(benches, conf_model_bench);
criterion_main!(benches);
