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

use convene_model::{
    error::ModelError, formulate::CoverageMode, index::SlotIndex, matrix::AttendanceMatrix,
};
use convene_solver::{SolveError, SolverBuilder, maximize_attendance, minimize_meetings};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_matrix(rng: &mut StdRng, slots: usize, entities: usize, density: f64) -> AttendanceMatrix {
    let rows: Vec<Vec<bool>> = (0..slots)
        .map(|_| (0..entities).map(|_| rng.random_bool(density)).collect())
        .collect();
    AttendanceMatrix::from_rows(rows).unwrap()
}

fn subsets(num_slots: usize) -> impl Iterator<Item = Vec<SlotIndex>> {
    (0u32..(1u32 << num_slots)).map(move |mask| {
        (0..num_slots)
            .filter(|&i| mask & (1 << i) != 0)
            .map(SlotIndex::new)
            .collect()
    })
}

fn brute_force_min_cover(matrix: &AttendanceMatrix) -> Option<usize> {
    subsets(matrix.num_slots())
        .filter(|s| matrix.covers_all(s.iter().copied()))
        .map(|s| s.len())
        .min()
}

fn brute_force_max_attendance(matrix: &AttendanceMatrix, k: usize) -> usize {
    subsets(matrix.num_slots())
        .filter(|s| s.len() == k)
        .map(|s| matrix.num_covered(s.iter().copied()))
        .max()
        .unwrap_or(0)
}

fn is_strictly_ascending(slots: &[SlotIndex]) -> bool {
    slots.windows(2).all(|w| w[0] < w[1])
}

#[test]
fn test_minimize_meetings_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..40 {
        let slots = rng.random_range(1..=12);
        let entities = rng.random_range(1..=10);
        let matrix = random_matrix(&mut rng, slots, entities, 0.3);

        let cover = minimize_meetings(&matrix).unwrap();
        match brute_force_min_cover(&matrix) {
            Some(best) => {
                assert_eq!(cover.len(), best, "\n{matrix}");
                assert!(matrix.covers_all(cover.iter().copied()), "\n{matrix}");
                assert!(!cover.is_empty());
            }
            None => assert!(cover.is_empty(), "\n{matrix}"),
        }
        assert!(is_strictly_ascending(&cover));
    }
}

#[test]
fn test_maximize_attendance_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..30 {
        let slots = rng.random_range(1..=12);
        let entities = rng.random_range(1..=10);
        let matrix = random_matrix(&mut rng, slots, entities, 0.25);
        let k = rng.random_range(0..=slots);

        let selection = maximize_attendance(&matrix, k).unwrap();
        assert_eq!(selection.len(), k, "\n{matrix}");
        assert!(is_strictly_ascending(&selection));
        assert_eq!(
            matrix.num_covered(selection.iter().copied()),
            brute_force_max_attendance(&matrix, k),
            "k = {k}\n{matrix}"
        );
    }
}

#[test]
fn test_triangle_example() {
    let matrix =
        AttendanceMatrix::from_binary_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]])
            .unwrap();

    let cover = minimize_meetings(&matrix).unwrap();
    assert_eq!(cover.len(), 2);
    assert!(matrix.covers_all(cover.iter().copied()));

    let single = maximize_attendance(&matrix, 1).unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(matrix.num_covered(single.iter().copied()), 2);
}

#[test]
fn test_budget_edges() {
    let mut rng = StdRng::seed_from_u64(99);
    let matrix = random_matrix(&mut rng, 6, 5, 0.4);

    assert!(maximize_attendance(&matrix, 0).unwrap().is_empty());

    let all = maximize_attendance(&matrix, 6).unwrap();
    assert_eq!(all, (0..6).map(SlotIndex::new).collect::<Vec<_>>());

    assert_eq!(
        maximize_attendance(&matrix, 7),
        Err(SolveError::InvalidInput(ModelError::BudgetOutOfRange {
            budget: 7,
            num_slots: 6
        }))
    );
}

#[test]
fn test_uncoverable_entity_gives_empty_cover() {
    let matrix = AttendanceMatrix::from_binary_rows(&[vec![1, 0, 1], vec![1, 0, 0]]).unwrap();
    assert!(minimize_meetings(&matrix).unwrap().is_empty());

    // Budgeted coverage still picks slots for the others.
    let selection = maximize_attendance(&matrix, 1).unwrap();
    assert_eq!(selection, vec![SlotIndex::new(0)]);
}

#[test]
fn test_malformed_input_is_rejected_before_solving() {
    assert_eq!(
        AttendanceMatrix::from_binary_rows(&[vec![1, 2]]),
        Err(ModelError::NonBinaryCell {
            row: 0,
            column: 1,
            value: 2
        })
    );
    assert!(matches!(
        AttendanceMatrix::from_binary_rows(&[vec![1, 0], vec![1]]),
        Err(ModelError::RaggedRow { .. })
    ));
}

#[test]
fn test_repeated_calls_are_identical() {
    let mut rng = StdRng::seed_from_u64(11);
    let matrix = random_matrix(&mut rng, 10, 8, 0.3);
    let first = minimize_meetings(&matrix).unwrap();
    let second = maximize_attendance(&matrix, 3).unwrap();
    for _ in 0..5 {
        assert_eq!(minimize_meetings(&matrix).unwrap(), first);
        assert_eq!(maximize_attendance(&matrix, 3).unwrap(), second);
    }
}

#[test]
fn test_thread_count_does_not_change_the_selection() {
    let mut rng = StdRng::seed_from_u64(314);
    let sequential = SolverBuilder::new().build();
    let parallel = SolverBuilder::new().with_threads(4).build();
    for _ in 0..15 {
        let slots = rng.random_range(3..=12);
        let entities = rng.random_range(2..=10);
        let matrix = random_matrix(&mut rng, slots, entities, 0.3);
        let k = rng.random_range(0..=slots);

        for mode in [
            CoverageMode::MinimumCover,
            CoverageMode::BudgetedCoverage { budget: k },
        ] {
            let a = sequential.solve(&matrix, mode).unwrap();
            let b = parallel.solve(&matrix, mode).unwrap();
            assert_eq!(a.slots(), b.slots(), "{mode}\n{matrix}");
            assert_eq!(a.objective(), b.objective());
            assert!(a.is_proven() && b.is_proven());
        }
    }
}
