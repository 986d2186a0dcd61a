use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use meadow_core::{Rng, point};
use meadow_flora::{MeadowConfig, PSpec, Painter, Quality, compose, make_plant};
use meadow_svg::Document;
use std::hint::black_box;
use std::time::Duration;

fn bench_plant(c: &mut Criterion) {
    let mut group = c.benchmark_group("plant");
    group.measurement_time(Duration::from_secs(5));

    for seed in [1u64, 12345, 777] {
        let spec = PSpec::sample(&mut Rng::new(seed), 600.0);
        group.bench_with_input(BenchmarkId::new("make_plant", seed), &spec, |b, spec| {
            b.iter_batched(
                || (Document::new(800.0, 600.0), Rng::new(seed)),
                |(mut doc, mut rng)| {
                    {
                        let mut painter = Painter::new(&mut doc, &mut rng, Quality::Fast);
                        make_plant(&mut painter, spec, point(400.0, 550.0))
                            .expect("plant generation");
                    }
                    black_box(doc.to_svg().len());
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));

    let cases = [("small", 400.0, 300.0), ("default", 1200.0, 800.0)];
    for (name, width, height) in cases {
        let config = MeadowConfig {
            width,
            height,
            seed: Some(12345),
            ..MeadowConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("compose", name), &config, |b, config| {
            b.iter(|| {
                let frames = compose(black_box(config), &mut config.rng()).expect("compose");
                black_box(frames.len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plant, bench_compose);
criterion_main!(benches);
