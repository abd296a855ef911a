use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use hearcheck_core::grader::{ResponseGrader, Signal};
use hearcheck_core::scheduler::PlaybackState;
use hearcheck_core::sequence::{build_plan, RoundMode};
use hearcheck_core::{Catalog, RoundStats, Tone};

fn bench_build_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_plan");
    let catalog = Catalog::standard();

    group.bench_function("ascending", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| build_plan(black_box(&catalog), RoundMode::Ascending, 7, &mut rng))
    });

    group.bench_function("random_100", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| build_plan(black_box(&catalog), RoundMode::Random, 100, &mut rng))
    });

    group.finish();
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let playing = PlaybackState::Playing(Tone::new(16000, "< 30"));

    group.bench_function("right_then_retrigger", |b| {
        let mut press = 0u64;
        b.iter(|| {
            let mut grader = ResponseGrader::new();
            let mut stats = RoundStats::new();
            for _ in 0..2 {
                press += 1;
                grader.grade(Signal { press_id: press }, black_box(&playing), &mut stats);
            }
            stats
        })
    });

    group.bench_function("bad", |b| {
        let mut grader = ResponseGrader::new();
        let mut stats = RoundStats::new();
        let mut press = 0u64;
        b.iter(|| {
            press += 1;
            grader.grade(
                Signal { press_id: press },
                black_box(&PlaybackState::Idle),
                &mut stats,
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build_plan, bench_grade);
criterion_main!(benches);
