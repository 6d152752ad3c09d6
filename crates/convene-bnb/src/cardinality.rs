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
    fixing::VariableFixings,
    index::VariableIndex,
    problem::{ConstraintKind, Problem},
};

/// An equality `x_1 + ... + x_r = count` over binary variables.
///
/// Such a row is checked combinatorially on every node before the
/// relaxation is solved: a node is dead once more than `count` of its
/// variables are fixed to one, or once too few remain free to reach
/// `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardinalityConstraint {
    variables: Vec<VariableIndex>,
    count: usize,
}

impl CardinalityConstraint {
    #[inline]
    pub fn new(variables: Vec<VariableIndex>, count: usize) -> Self {
        Self { variables, count }
    }

    #[inline]
    pub fn variables(&self) -> &[VariableIndex] {
        &self.variables
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` if some completion of `fixings` can still meet the
    /// count.
    pub fn is_reachable(&self, fixings: &VariableFixings) -> bool {
        let mut ones = 0;
        let mut free = 0;
        for &variable in &self.variables {
            match fixings.value(variable) {
                Some(true) => ones += 1,
                Some(false) => {}
                None => free += 1,
            }
        }
        ones <= self.count && ones + free >= self.count
    }
}

/// Finds every equality row with unit coefficients and a non-negative
/// integral right-hand side.
pub fn detect_cardinality_constraints(problem: &Problem) -> Vec<CardinalityConstraint> {
    problem
        .constraints()
        .iter()
        .filter(|c| c.kind() == ConstraintKind::Equal)
        .filter(|c| c.terms().iter().all(|t| t.coefficient == 1.0))
        .filter(|c| c.rhs() >= 0.0 && c.rhs().fract() == 0.0)
        .map(|c| {
            CardinalityConstraint::new(
                c.terms().iter().map(|t| t.variable).collect(),
                c.rhs() as usize,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_model::{
        formulate::{CoverageMode, formulate},
        index::SlotIndex,
        matrix::AttendanceMatrix,
        problem::{ProblemBuilder, Sense, Term, VariableKind},
    };

    fn vi(i: usize) -> VariableIndex {
        VariableIndex::new(i)
    }

    #[test]
    fn test_detects_budget_row_of_budgeted_coverage() {
        let matrix =
            AttendanceMatrix::from_binary_rows(&[vec![1, 0], vec![0, 1], vec![1, 1]]).unwrap();
        let problem = formulate(&matrix, CoverageMode::BudgetedCoverage { budget: 2 }).unwrap();
        let found = detect_cardinality_constraints(&problem);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].count(), 2);
        assert_eq!(found[0].variables(), &[vi(0), vi(1), vi(2)]);

        let cover = formulate(&matrix, CoverageMode::MinimumCover).unwrap();
        assert!(detect_cardinality_constraints(&cover).is_empty());
    }

    #[test]
    fn test_ignores_weighted_or_fractional_rows() {
        let mut builder = ProblemBuilder::new(Sense::Minimize);
        let a = builder.add_variable(VariableKind::Slot(SlotIndex::new(0)), 1);
        let b = builder.add_variable(VariableKind::Slot(SlotIndex::new(1)), 1);
        builder.add_constraint(
            [Term::new(a, 2.0), Term::new(b, 1.0)],
            ConstraintKind::Equal,
            2.0,
        );
        builder.add_constraint(
            [Term::new(a, 1.0), Term::new(b, 1.0)],
            ConstraintKind::Equal,
            1.5,
        );
        builder.add_constraint(
            [Term::new(a, 1.0), Term::new(b, 1.0)],
            ConstraintKind::Equal,
            1.0,
        );
        let problem = builder.build().unwrap();
        let found = detect_cardinality_constraints(&problem);
        assert_eq!(found, vec![CardinalityConstraint::new(vec![a, b], 1)]);
    }

    #[test]
    fn test_reachability() {
        let constraint = CardinalityConstraint::new(vec![vi(0), vi(1), vi(2)], 2);
        let free = VariableFixings::new(3);
        assert!(constraint.is_reachable(&free));

        let too_many = free.with_fixed(vi(0), true).with_fixed(vi(1), true);
        assert!(constraint.is_reachable(&too_many));
        assert!(!constraint.is_reachable(&too_many.with_fixed(vi(2), true)));

        let too_few = free.with_fixed(vi(0), false).with_fixed(vi(1), false);
        assert!(!constraint.is_reachable(&too_few));
    }
}
