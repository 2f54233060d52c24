use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use knightfall::board::{GameState, PlayerId};
use knightfall::eval::heuristic_by_name;
use knightfall::protocol::ifen::{encode_ifen, parse_ifen};
use knightfall::search::Searcher;

/// A budget the fixed-depth benches never exhaust.
const NO_CUTOFF: Duration = Duration::from_secs(3600);

/// Plays a deterministic opening to produce a mid-game position.
fn midgame_state() -> GameState {
    let mut state = GameState::initial();
    for _ in 0..10 {
        let action = state.actions()[0];
        state = state.result(action);
    }
    state
}

fn bench_actions(c: &mut Criterion) {
    let state = midgame_state();
    c.bench_function("actions_midgame", |b| {
        b.iter(|| black_box(&state).actions())
    });
}

fn bench_liberties(c: &mut Criterion) {
    let state = midgame_state();
    let loc = state.loc(PlayerId::P1);
    c.bench_function("liberties_midgame", |b| {
        b.iter(|| black_box(&state).liberties(black_box(loc)))
    });
}

fn bench_result(c: &mut Criterion) {
    let state = midgame_state();
    let action = state.actions()[0];
    c.bench_function("result_midgame", |b| {
        b.iter(|| black_box(&state).result(black_box(action)))
    });
}

fn bench_heuristics(c: &mut Criterion) {
    let state = midgame_state();
    let player = state.side_to_move();
    let mut group = c.benchmark_group("heuristic");
    for name in ["mobility", "center", "obstacle", "proximity"] {
        let heuristic = heuristic_by_name(name).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| heuristic.score(black_box(&state), black_box(player)))
        });
    }
    group.finish();
}

fn bench_search_depth_4(c: &mut Criterion) {
    let state = midgame_state();
    let heuristic = heuristic_by_name("center").unwrap();
    c.bench_function("search_depth_4", |b| {
        b.iter(|| {
            let mut searcher = Searcher::new(heuristic.as_ref(), state.side_to_move(), NO_CUTOFF);
            searcher.choose(black_box(&state), 4).unwrap()
        })
    });
}

fn bench_search_100ms(c: &mut Criterion) {
    let state = midgame_state();
    let heuristic = heuristic_by_name("center").unwrap();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("depth_10_100ms", |b| {
        b.iter(|| {
            let mut searcher = Searcher::new(
                heuristic.as_ref(),
                state.side_to_move(),
                Duration::from_millis(100),
            );
            searcher.choose(black_box(&state), 10).unwrap()
        })
    });
    group.finish();
}

fn bench_ifen_roundtrip(c: &mut Criterion) {
    let state = midgame_state();
    let ifen = encode_ifen(&state);
    c.bench_function("ifen_parse", |b| {
        b.iter(|| parse_ifen(black_box(&ifen)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_actions,
    bench_liberties,
    bench_result,
    bench_heuristics,
    bench_search_depth_4,
    bench_search_100ms,
    bench_ifen_roundtrip,
);
criterion_main!(benches);
