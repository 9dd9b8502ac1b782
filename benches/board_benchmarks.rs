use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use game_2048::{
    autoplay::{play_session, Autoplayer},
    grid::{Grid, Transform},
    save::MemoryStorage,
    Board, Direction, Game, Timings,
};

#[cfg(feature = "image")]
use game_2048::render::image_renderer::ImageRenderer;

// Fixed seed for deterministic benchmarks
const BENCHMARK_SEED: u64 = 12345;

/// A board with `filled` random low tiles, mimicking the middle of a game.
fn create_random_board(filled: usize) -> Board {
    let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(BENCHMARK_SEED);
    let mut rows = [[0u8; 4]; 4];
    let mut placed = 0;

    while placed < filled.min(16) {
        let (row, col) = (rng.gen_range(0..4), rng.gen_range(0..4));

        if rows[row][col] == 0 {
            rows[row][col] = rng.gen_range(1..6);
            placed += 1;
        }
    }

    Board::from_exponents(rows)
}

fn bench_shift(c: &mut Criterion) {
    let mut group = c.benchmark_group("shift");

    for filled in [4, 8, 14].iter() {
        for direction in Direction::ALL {
            group.bench_with_input(format!("{:?}_{}", direction, filled), filled, |b, &filled| {
                b.iter_batched(
                    || create_random_board(filled),
                    |mut board| black_box(board.shift(direction)),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_animate(c: &mut Criterion) {
    let mut group = c.benchmark_group("animate");

    group.bench_function("settle_after_left", |b| {
        b.iter_batched(
            || {
                let mut board = create_random_board(12);
                board.shift(Direction::Left);
                board
            },
            |mut board| {
                while board.animate() {}
                black_box(board)
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_grid_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_transform");
    let grid = Grid::new(4, &mut |row, col| Some(row * 4 + col));

    for transform in Transform::ALL {
        group.bench_function(format!("{:?}", transform), |b| {
            b.iter_batched(
                || grid.clone(),
                |mut grid| {
                    grid.transform(transform);
                    black_box(grid)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("headless_game", |b| {
        b.iter(|| {
            let mut game = Game::new(MemoryStorage::default(), BENCHMARK_SEED, Timings::default());
            let mut player = Autoplayer::new(BENCHMARK_SEED);

            black_box(play_session(&mut game, &mut player, 100_000))
        });
    });

    group.finish();
}

#[cfg(feature = "image")]
fn bench_image_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_frame");
    let board = create_random_board(10);

    for zoom in [1, 4].iter() {
        group.bench_with_input(format!("zoom_{}", zoom), zoom, |b, &zoom| {
            let mut renderer = ImageRenderer::new(zoom);

            b.iter(|| black_box(board.draw(&mut renderer)));
        });
    }

    group.finish();
}

fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(100)
        .measurement_time(std::time::Duration::from_secs(10))
        .warm_up_time(std::time::Duration::from_secs(3))
}

#[cfg(feature = "image")]
criterion_group!(
    name = benches;
    config = configure_criterion();
    targets =
        bench_shift,
        bench_animate,
        bench_grid_transform,
        bench_session,
        bench_image_frame
);

#[cfg(not(feature = "image"))]
criterion_group!(
    name = benches;
    config = configure_criterion();
    targets =
        bench_shift,
        bench_animate,
        bench_grid_transform,
        bench_session
);

criterion_main!(benches);
