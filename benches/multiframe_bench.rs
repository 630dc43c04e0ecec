use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vista::camera::{Camera, ClampLimits, OrbitCamera};
use vista::multiframe::{ColorImage, CpuAccumulator, MultiframeAccumulator, SampleKernel};
use vista::options::MultiframeOptions;

fn kernel_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_generate");
    for grid in [2, 5, 8] {
        group.bench_function(format!("{grid}x{grid}_gaussian"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                black_box(SampleKernel::generate(
                    black_box(grid),
                    true,
                    2.0,
                    0.8,
                    &mut rng,
                ))
            });
        });
    }
    group.finish();
}

fn cpu_accumulation_benchmark(c: &mut Criterion) {
    let options = MultiframeOptions {
        sample_count: 4,
        ..MultiframeOptions::default()
    };
    let source = ColorImage::filled(256, 256, [0.25, 0.5, 0.75, 1.0]);

    c.bench_function("cpu_accumulate_256x256_full_kernel", |b| {
        let mut accumulator = MultiframeAccumulator::new(CpuAccumulator, &options);
        let mut output = ColorImage::new(256, 256);
        b.iter(|| {
            accumulator.moved();
            while accumulator
                .update(black_box(&source), &mut output)
                .unwrap_or(false)
            {}
        });
    });
}

fn orbit_tick_benchmark(c: &mut Criterion) {
    let mut orbit = OrbitCamera::new(Camera::default(), ClampLimits::default(), 0.2);
    c.bench_function("orbit_tick", |b| {
        b.iter(|| {
            orbit.set_yaw(orbit.state().target_yaw + 1.0);
            black_box(orbit.tick(black_box(1.0 / 60.0)))
        });
    });
}

criterion_group!(
    benches,
    kernel_benchmark,
    cpu_accumulation_benchmark,
    orbit_tick_benchmark
);
criterion_main!(benches);
