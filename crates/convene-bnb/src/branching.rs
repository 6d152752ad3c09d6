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

//! Branching variable selection.
//!
//! A `BranchingRule` picks the free variable whose relaxed value is
//! fractional and on which the engine splits a node. Slot variables always
//! take precedence; auxiliary variables are only considered once every
//! free slot variable is integral, which the generic engine needs to stay
//! complete on programs with fractional indicators.

use convene_lp::relaxation::Relaxation;
use convene_model::{fixing::VariableFixings, index::VariableIndex, problem::Problem};

/// Chooses the variable to branch on at a fractional node.
pub trait BranchingRule {
    /// Returns the name of the rule.
    fn name(&self) -> &str;

    /// Picks a free variable of `values` more than `tolerance` away from 0
    /// and 1, or `None` if there is none.
    fn select(
        &self,
        problem: &Problem,
        values: &[f64],
        fixings: &VariableFixings,
        tolerance: f64,
    ) -> Option<VariableIndex>;
}

impl std::fmt::Debug for dyn BranchingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BranchingRule({})", self.name())
    }
}

/// Scans the free fractional variables in index order, slots first, and
/// keeps the best one by `score` (lower is better, ties to lowest index).
#[inline]
fn select_by<F>(
    problem: &Problem,
    values: &[f64],
    fixings: &VariableFixings,
    tolerance: f64,
    score: F,
) -> Option<VariableIndex>
where
    F: Fn(f64) -> f64,
{
    let mut best_slot: Option<(VariableIndex, f64)> = None;
    let mut best_auxiliary: Option<(VariableIndex, f64)> = None;

    for variable in problem.variables() {
        let index = variable.index();
        if fixings.is_fixed(index) {
            continue;
        }
        let value = values[index.get()];
        if Relaxation::fractionality(value) <= tolerance {
            continue;
        }

        let s = score(value);
        let best = if variable.is_slot() {
            &mut best_slot
        } else {
            &mut best_auxiliary
        };
        if best.is_none_or(|(_, b)| s < b) {
            *best = Some((index, s));
        }
    }

    best_slot.or(best_auxiliary).map(|(index, _)| index)
}

/// Branches on the variable whose value is closest to 0.5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MostFractionalBranching;

impl BranchingRule for MostFractionalBranching {
    fn name(&self) -> &str {
        "MostFractionalBranching"
    }

    fn select(
        &self,
        problem: &Problem,
        values: &[f64],
        fixings: &VariableFixings,
        tolerance: f64,
    ) -> Option<VariableIndex> {
        select_by(problem, values, fixings, tolerance, |v| (v - 0.5).abs())
    }
}

/// Branches on the lowest-index fractional variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstFractionalBranching;

impl BranchingRule for FirstFractionalBranching {
    fn name(&self) -> &str {
        "FirstFractionalBranching"
    }

    fn select(
        &self,
        problem: &Problem,
        values: &[f64],
        fixings: &VariableFixings,
        tolerance: f64,
    ) -> Option<VariableIndex> {
        select_by(problem, values, fixings, tolerance, |_| 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_model::{
        index::{EntityIndex, SlotIndex},
        problem::{ProblemBuilder, Sense, VariableKind},
    };

    const TOL: f64 = 1e-6;

    /// Three slot variables followed by two entity variables.
    fn problem() -> Problem {
        let mut builder = ProblemBuilder::new(Sense::Maximize);
        for i in 0..3 {
            builder.add_variable(VariableKind::Slot(SlotIndex::new(i)), 0);
        }
        for j in 0..2 {
            builder.add_variable(VariableKind::Entity(EntityIndex::new(j)), 1);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_most_fractional_prefers_closest_to_half_with_lowest_index_ties() {
        let p = problem();
        let fixings = VariableFixings::for_problem(&p);
        let rule = MostFractionalBranching;

        let values = [0.2, 0.6, 0.4, 0.5, 0.5];
        assert_eq!(
            rule.select(&p, &values, &fixings, TOL),
            Some(VariableIndex::new(1))
        );

        let values = [0.3, 0.7, 1.0, 0.5, 0.0];
        assert_eq!(
            rule.select(&p, &values, &fixings, TOL),
            Some(VariableIndex::new(0))
        );
    }

    #[test]
    fn test_falls_back_to_auxiliary_variables() {
        let p = problem();
        let fixings = VariableFixings::for_problem(&p);
        let values = [1.0, 0.0, 1.0 - 1e-9, 0.25, 0.5];
        assert_eq!(
            MostFractionalBranching.select(&p, &values, &fixings, TOL),
            Some(VariableIndex::new(4))
        );
        assert_eq!(
            FirstFractionalBranching.select(&p, &values, &fixings, TOL),
            Some(VariableIndex::new(3))
        );

        let integral = [1.0, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(MostFractionalBranching.select(&p, &integral, &fixings, TOL), None);
    }

    #[test]
    fn test_fixed_variables_are_skipped() {
        let p = problem();
        let fixings = VariableFixings::for_problem(&p).with_fixed(VariableIndex::new(1), true);
        let values = [0.1, 0.5, 0.3, 0.0, 0.0];
        assert_eq!(
            MostFractionalBranching.select(&p, &values, &fixings, TOL),
            Some(VariableIndex::new(2))
        );
    }
}
