use std::{io, num::NonZeroUsize, thread};

use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
};
use rand::{thread_rng, Rng};

use nbody_relay::{config::BodyConfig, prelude::*};

const TIME_STEPS: usize = 10;

fn random_system(i: usize) -> SystemConfig {
    let mut rng = thread_rng();
    let mut gen = |range| rng.gen_range(range);

    let bodies = (0..i)
        .map(|_| BodyConfig {
            mass: gen(0.1..100.0),
            position: Vector::new(gen(-1000.0..1000.0), gen(-1000.0..1000.0)),
            velocity: Vector::new(gen(-1.0..1.0), gen(-1.0..1.0)),
        })
        .collect();

    SystemConfig {
        gravity: 1.0,
        time_steps: TIME_STEPS,
        bodies,
    }
}

fn sink() -> TraceWriter<io::Sink> {
    TraceWriter::new(io::sink(), io::sink())
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("nbody_relay");
    group
        .plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic))
        .warm_up_time(std::time::Duration::from_secs(1))
        .sample_size(20);

    let parameters = Parameters::default();
    let workers = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);

    for i in (2..=10).map(|i| 2_usize.pow(i)) {
        let config = random_system(i);

        group.bench_with_input(BenchmarkId::new("sequential", i), &config, |b, input| {
            b.iter(|| sequential::run(input, &parameters, sink()).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("parallel::BruteForce", i), &config, |b, input| {
            b.iter(|| run(&BruteForce, input, &parameters, workers, sink()).unwrap())
        });

        group.bench_with_input(
            BenchmarkId::new("parallel::BruteForcePairs", i),
            &config,
            |b, input| b.iter(|| run(&BruteForcePairs, input, &parameters, workers, sink()).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
