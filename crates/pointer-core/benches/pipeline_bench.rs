//! Criterion benchmarks for the per-event motion pipeline.
//!
//! Every touch move runs the sampler on the controller and every `/mouse`
//! request runs the boundary clamp plus one smoothing step on the host, so
//! both sit on the latency-critical path between a finger and the cursor.
//!
//! Run with:
//! ```bash
//! cargo bench --package pointer-core --bench pipeline_bench
//! ```

use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointer_core::{
    BoundedDelta, MotionSampler, SamplerConfig, SmoothingConfig, SmoothingState, TouchSample,
};

// ── Fixture builders ──────────────────────────────────────────────────────────

/// A sampler that has already seen the start sample and the baseline move.
fn primed_sampler() -> MotionSampler {
    let mut sampler = MotionSampler::new(SamplerConfig::default());
    sampler.on_touch_start(TouchSample::new(0.0, 0.0, 0));
    sampler.on_touch_move(TouchSample::new(0.0, 0.0, 0));
    sampler
}

/// A smoothing state with one committed update at `t0`.
fn warm_state(t0: Instant, cfg: &SmoothingConfig) -> SmoothingState {
    let seed = BoundedDelta::validate(5.0, 5.0, 100.0).expect("finite seed");
    SmoothingState::idle().advance(&seed, t0, cfg).next
}

// ── Benchmarks: sampler ───────────────────────────────────────────────────────

fn bench_sampler_touch_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler");

    group.bench_function("touch_move_steady_drag", |b| {
        let mut sampler = primed_sampler();
        let mut t = 0u64;
        b.iter(|| {
            t += 16;
            let delta = sampler.on_touch_move(black_box(TouchSample::new(
                (t / 16) as f64 * 4.0,
                (t / 16) as f64 * 2.0,
                t,
            )));
            sampler.should_transmit(&delta)
        })
    });

    group.finish();
}

// ── Benchmarks: host integration math ─────────────────────────────────────────

fn bench_bound_and_smooth(c: &mut Criterion) {
    let cfg = SmoothingConfig::default();
    let t0 = Instant::now();
    let state = warm_state(t0, &cfg);
    let mut group = c.benchmark_group("bound_and_smooth");

    // In-range input vs. input that must be clamped on both axes.
    for &(label, raw) in &[("in_range", 12.0f64), ("clamped", 5_000.0f64)] {
        group.bench_with_input(BenchmarkId::new("input", label), &raw, |b, &raw| {
            b.iter(|| {
                let bounded = BoundedDelta::validate(black_box(raw), black_box(-raw), 100.0)
                    .expect("finite input");
                state.advance(&bounded, black_box(t0 + Duration::from_millis(16)), &cfg)
            })
        });
    }

    group.bench_function("reset_after_gap", |b| {
        b.iter(|| {
            let bounded = BoundedDelta::validate(black_box(12.0), black_box(3.0), 100.0)
                .expect("finite input");
            state.advance(&bounded, black_box(t0 + Duration::from_millis(500)), &cfg)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sampler_touch_move, bench_bound_and_smooth);
criterion_main!(benches);
