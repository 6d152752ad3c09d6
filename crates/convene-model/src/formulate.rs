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

//! Formulation of the two attendance problems as 0/1 programs.
//!
//! Both modes share one slot variable `x_i` per slot, declared first and in
//! slot order so that variable `i` selects slot `i`.
//!
//! Minimum cover
//! - minimize `sum x_i`
//! - `sum_{i attends j} x_i >= 1` for every entity `j`
//!
//! Budgeted coverage
//! - one indicator `y_j` per entity, declared after the slot variables
//! - maximize `sum y_j`
//! - `sum_{i attends j} x_i - y_j >= 0` for every entity `j`
//! - `sum x_i = k`
//!
//! Only the non-zero matrix cells become terms, so an entity nobody can
//! attend yields a term-less covering row `0 >= 1`, which the relaxation
//! reports as infeasible.

use crate::{
    error::ModelError,
    index::{EntityIndex, SlotIndex},
    matrix::AttendanceMatrix,
    problem::{ConstraintKind, Problem, ProblemBuilder, Sense, Term, VariableKind},
};

/// Which attendance problem to formulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverageMode {
    /// Fewest slots such that every entity attends at least one.
    MinimumCover,
    /// Exactly `budget` slots maximizing the number of entities that attend.
    BudgetedCoverage { budget: usize },
}

impl std::fmt::Display for CoverageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageMode::MinimumCover => write!(f, "minimum cover"),
            CoverageMode::BudgetedCoverage { budget } => {
                write!(f, "budgeted coverage (k = {})", budget)
            }
        }
    }
}

/// Builds the 0/1 program for `mode` over `matrix`.
///
/// # Errors
///
/// `ModelError::BudgetOutOfRange` if the budget exceeds the number of slots.
pub fn formulate(matrix: &AttendanceMatrix, mode: CoverageMode) -> Result<Problem, ModelError> {
    match mode {
        CoverageMode::MinimumCover => formulate_minimum_cover(matrix),
        CoverageMode::BudgetedCoverage { budget } => formulate_budgeted_coverage(matrix, budget),
    }
}

fn formulate_minimum_cover(matrix: &AttendanceMatrix) -> Result<Problem, ModelError> {
    let (m, n) = (matrix.num_slots(), matrix.num_entities());
    let mut builder = ProblemBuilder::with_capacity(Sense::Minimize, m, n);

    let slot_vars: Vec<_> = matrix
        .slots()
        .map(|slot| builder.add_variable(VariableKind::Slot(slot), 1))
        .collect();

    for entity in (0..n).map(EntityIndex::new) {
        let terms = matrix
            .covering_slots(entity)
            .map(|slot| Term::new(slot_vars[slot.get()], 1.0));
        builder.add_constraint(terms, ConstraintKind::GreaterEqual, 1.0);
    }

    builder.build()
}

fn formulate_budgeted_coverage(
    matrix: &AttendanceMatrix,
    budget: usize,
) -> Result<Problem, ModelError> {
    let (m, n) = (matrix.num_slots(), matrix.num_entities());
    if budget > m {
        return Err(ModelError::BudgetOutOfRange {
            budget,
            num_slots: m,
        });
    }

    let mut builder = ProblemBuilder::with_capacity(Sense::Maximize, m + n, n + 1);

    let slot_vars: Vec<_> = (0..m)
        .map(|i| builder.add_variable(VariableKind::Slot(SlotIndex::new(i)), 0))
        .collect();
    let entity_vars: Vec<_> = (0..n)
        .map(|j| builder.add_variable(VariableKind::Entity(EntityIndex::new(j)), 1))
        .collect();

    for (j, &indicator) in entity_vars.iter().enumerate() {
        let terms = matrix
            .covering_slots(EntityIndex::new(j))
            .map(|slot| Term::new(slot_vars[slot.get()], 1.0))
            .chain(std::iter::once(Term::new(indicator, -1.0)));
        builder.add_constraint(terms, ConstraintKind::GreaterEqual, 0.0);
    }

    builder.add_constraint(
        slot_vars.iter().map(|&x| Term::new(x, 1.0)),
        ConstraintKind::Equal,
        budget as f64,
    );

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::VariableIndex;

    fn triangle() -> AttendanceMatrix {
        AttendanceMatrix::from_binary_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]])
            .unwrap()
    }

    fn term_vars(problem: &Problem, row: usize) -> Vec<(usize, f64)> {
        problem.constraints()[row]
            .terms()
            .iter()
            .map(|t| (t.variable.get(), t.coefficient))
            .collect()
    }

    #[test]
    fn test_minimum_cover_shape() {
        let p = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        assert_eq!(p.sense(), Sense::Minimize);
        assert_eq!(p.num_variables(), 3);
        assert_eq!(p.num_constraints(), 3);
        assert_eq!(p.objective(), &[1, 1, 1]);

        // Entity 0 attends slots 0 and 2.
        assert_eq!(term_vars(&p, 0), vec![(0, 1.0), (2, 1.0)]);
        assert_eq!(p.constraints()[0].kind(), ConstraintKind::GreaterEqual);
        assert_eq!(p.constraints()[0].rhs(), 1.0);
        assert!(p.variables().iter().all(|v| v.is_slot()));
    }

    #[test]
    fn test_minimum_cover_keeps_uncoverable_row() {
        let m = AttendanceMatrix::from_binary_rows(&[vec![1, 0], vec![1, 0]]).unwrap();
        let p = formulate(&m, CoverageMode::MinimumCover).unwrap();
        assert!(p.constraints()[1].terms().is_empty());
        assert_eq!(p.first_violated(&[true, true], 1e-9).map(|c| c.get()), Some(1));
    }

    #[test]
    fn test_budgeted_coverage_shape() {
        let p = formulate(&triangle(), CoverageMode::BudgetedCoverage { budget: 2 }).unwrap();
        assert_eq!(p.sense(), Sense::Maximize);
        assert_eq!(p.num_variables(), 6);
        assert_eq!(p.num_constraints(), 4);
        assert_eq!(p.objective(), &[0, 0, 0, 1, 1, 1]);

        // Entity 1 attends slots 0 and 1; its indicator is variable 4.
        assert_eq!(term_vars(&p, 1), vec![(0, 1.0), (1, 1.0), (4, -1.0)]);

        let budget_row = &p.constraints()[3];
        assert_eq!(budget_row.kind(), ConstraintKind::Equal);
        assert_eq!(budget_row.rhs(), 2.0);
        assert_eq!(budget_row.terms().len(), 3);

        assert_eq!(
            p.variable(VariableIndex::new(5)).kind(),
            VariableKind::Entity(EntityIndex::new(2))
        );
    }

    #[test]
    fn test_budget_bounds() {
        let m = triangle();
        assert!(formulate(&m, CoverageMode::BudgetedCoverage { budget: 0 }).is_ok());
        assert!(formulate(&m, CoverageMode::BudgetedCoverage { budget: 3 }).is_ok());
        assert_eq!(
            formulate(&m, CoverageMode::BudgetedCoverage { budget: 4 }),
            Err(ModelError::BudgetOutOfRange {
                budget: 4,
                num_slots: 3
            })
        );
    }

    #[test]
    fn test_feasible_assignments_score_as_expected() {
        let p = formulate(&triangle(), CoverageMode::BudgetedCoverage { budget: 1 }).unwrap();
        // Slot 0 selected, entities 0 and 1 marked covered.
        let values = [true, false, false, true, true, false];
        assert_eq!(p.first_violated(&values, 1e-9), None);
        assert_eq!(p.objective_value(&values), 2);

        // Claiming entity 2 without a covering slot violates its row.
        let cheating = [true, false, false, true, true, true];
        assert_eq!(p.first_violated(&cheating, 1e-9).map(|c| c.get()), Some(2));
    }
}
