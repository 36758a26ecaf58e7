use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use w3pi::lowlevel::{bitonic_sort, Direction, NetworkStats};
use w3pi::{
    Candidate, EventProcessor, FeatureVector, Filter, FilterConfig, IsolationConfig,
    NetworkConfig, ParticleId, PipelineConfig, RankingNetwork,
};

fn make_event(len: usize, seed: usize) -> Vec<Candidate> {
    (0..len)
        .map(|i| {
            let h = (i * 37 + seed * 101) ^ (i * i * 13);
            let pt = (h % 240) as f32 * 0.25 + 0.5;
            let eta = ((h / 7) % 520) as f32 * 0.01 - 2.6;
            let phi = ((h / 3) % 628) as f32 * 0.01 - 3.1;
            let pid = ParticleId::from_bits((h % 8) as u8);
            let z0 = ((h / 11) % 40) as f32 - 20.0;
            Candidate::from_physical(pt, eta, phi, pid, z0)
        })
        .collect()
}

fn linear_score(f: &FeatureVector) -> f32 {
    f[0] * 0.03 + f[1] * 0.02 + f[6] * 0.01 - f[5] * 0.1
}

fn bench_network(c: &mut Criterion) {
    let event = make_event(208, 1);
    let mask = Filter::new(FilterConfig::default()).unwrap().mask(&event);

    for (name, hybrid) in [("rank_208_p8_plain", false), ("rank_208_p8_hybrid", true)] {
        let network = RankingNetwork::new(NetworkConfig {
            hybrid,
            ..NetworkConfig::default()
        })
        .unwrap();
        c.bench_function(name, |b| {
            b.iter(|| black_box(network.rank(&event, &mask).unwrap()));
        });
    }

    if cfg!(feature = "rayon") {
        let network = RankingNetwork::new(NetworkConfig {
            parallel: true,
            ..NetworkConfig::default()
        })
        .unwrap();
        c.bench_function("rank_208_p8_parallel", |b| {
            b.iter(|| black_box(network.rank(&event, &mask).unwrap()));
        });
    }

    let keys: Vec<u32> = (0..256u32).map(|i| i.wrapping_mul(2654435761) >> 20).collect();
    c.bench_function("bitonic_sort_256", |b| {
        b.iter(|| {
            let mut v = keys.clone();
            let mut stats = NetworkStats::default();
            bitonic_sort(&mut v, Direction::Descending, false, &mut stats);
            black_box(v)
        });
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let events: Vec<Vec<Candidate>> = (0..64).map(|seed| make_event(180, seed)).collect();

    let processor = EventProcessor::new(PipelineConfig::default(), linear_score).unwrap();
    c.bench_function("event_default", |b| {
        b.iter(|| black_box(processor.process(&events[0]).unwrap()));
    });

    let isolated = EventProcessor::new(
        PipelineConfig {
            filter: FilterConfig {
                isolation: Some(IsolationConfig::default()),
                ..FilterConfig::default()
            },
            ..PipelineConfig::default()
        },
        linear_score,
    )
    .unwrap();
    c.bench_function("event_isolation", |b| {
        b.iter(|| black_box(isolated.process(&events[0]).unwrap()));
    });

    c.bench_function("batch_64_sequential", |b| {
        b.iter(|| black_box(processor.process_batch(&events)));
    });

    if cfg!(feature = "rayon") {
        let parallel = EventProcessor::new(
            PipelineConfig {
                parallel: true,
                ..PipelineConfig::default()
            },
            linear_score,
        )
        .unwrap();
        c.bench_function("batch_64_parallel", |b| {
            b.iter(|| black_box(parallel.process_batch(&events)));
        });
    }
}

criterion_group!(benches, bench_network, bench_pipeline);
criterion_main!(benches);
