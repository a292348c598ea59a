//! # Resequencing Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use arm_if::order::Arrangement;
use sort_lib::{
    reseq_ctrl::{Params, ReseqCtrl, SortCmd},
    sim_arm::SimArm,
};
use util::module::State;

/// Number of cells in the benchmark trays.
const NUM_CELLS: usize = 256;

/// A tray rotated by one: a single cycle touching every cell, the worst case
/// for a fixed tray size.
fn rotated_arrangement(n: usize) -> Arrangement {
    let mut cubes: Vec<usize> = (2..=n).collect();
    cubes.push(1);
    Arrangement::from_cubes(cubes).unwrap()
}

/// A tray of adjacent swaps: the largest possible number of cycles.
fn swapped_arrangement(n: usize) -> Arrangement {
    let cubes: Vec<usize> = (1..=n)
        .map(|i| if i % 2 == 0 { i - 1 } else { i + 1 })
        .collect();
    Arrangement::from_cubes(cubes).unwrap()
}

fn reseq_benchmark(c: &mut Criterion) {
    let params = Params {
        max_num_cells: NUM_CELLS,
        archive_relocations: false,
    };

    c.bench_function("ReseqCtrl::proc::single_cycle", |b| {
        b.iter(|| {
            let arrangement = rotated_arrangement(NUM_CELLS);
            let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(&arrangement));
            ctrl.set_params(params.clone());
            ctrl.proc(&Some(SortCmd { arrangement })).unwrap()
        })
    });

    c.bench_function("ReseqCtrl::proc::adjacent_swaps", |b| {
        b.iter(|| {
            let arrangement = swapped_arrangement(NUM_CELLS);
            let mut ctrl = ReseqCtrl::new(SimArm::from_arrangement(&arrangement));
            ctrl.set_params(params.clone());
            ctrl.proc(&Some(SortCmd { arrangement })).unwrap()
        })
    });
}

criterion_group!(benches, reseq_benchmark);
criterion_main!(benches);
