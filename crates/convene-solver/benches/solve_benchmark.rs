// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use convene_model::{formulate::CoverageMode, matrix::AttendanceMatrix};
use convene_solver::SolverBuilder;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

fn random_matrix(seed: u64, slots: usize, entities: usize) -> AttendanceMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<bool>> = (0..slots)
        .map(|_| (0..entities).map(|_| rng.random_bool(0.3)).collect())
        .collect();
    AttendanceMatrix::from_rows(rows).expect("generated matrix is rectangular")
}

fn bench_modes(c: &mut Criterion) {
    let sizes = [(10, 10), (20, 15), (30, 25)];
    let mut group = c.benchmark_group("solve_benchmark");

    for threads in [1, 4] {
        let solver = SolverBuilder::new().with_threads(threads).build();
        for &(slots, entities) in &sizes {
            let matrix = random_matrix(slots as u64, slots, entities);
            let label = format!("{}x{}", slots, entities);
            group.throughput(Throughput::Elements(slots as u64));

            group.bench_with_input(
                BenchmarkId::new(format!("min_cover/t{}", threads), &label),
                &matrix,
                |b, matrix| {
                    b.iter(|| {
                        solver
                            .solve(black_box(matrix), CoverageMode::MinimumCover)
                            .expect("minimum cover solve failed")
                    })
                },
            );

            let budget = slots / 4;
            group.bench_with_input(
                BenchmarkId::new(format!("budgeted/t{}", threads), &label),
                &matrix,
                |b, matrix| {
                    b.iter(|| {
                        solver
                            .solve(black_box(matrix), CoverageMode::BudgetedCoverage { budget })
                            .expect("budgeted coverage solve failed")
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_modes);
criterion_main!(benches);
