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

//! The caller-facing result of a solve.

use convene_bnb::{
    incumbent::Incumbent,
    result::{BnbSolverOutcome, TerminationReason},
    stats::BnbSolverStatistics,
};
use convene_model::{index::SlotIndex, problem::Problem};

/// Slots selected by an incumbent, in ascending index order.
///
/// No incumbent yields an empty selection.
pub fn extract(problem: &Problem, incumbent: Option<&Incumbent>) -> Vec<SlotIndex> {
    let Some(incumbent) = incumbent else {
        return Vec::new();
    };
    let mut slots: Vec<SlotIndex> = problem
        .slot_variables()
        .filter(|&(variable, _)| incumbent.value(variable))
        .map(|(_, slot)| slot)
        .collect();
    slots.sort_unstable();
    slots
}

/// A set of slots together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    slots: Vec<SlotIndex>,
    objective: Option<i64>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl Selection {
    /// Builds the selection reported by `outcome` for `problem`.
    pub fn from_outcome(problem: &Problem, outcome: BnbSolverOutcome) -> Self {
        let (result, termination_reason, statistics) = outcome.into_parts();
        let slots = extract(problem, result.incumbent());
        let objective = result.incumbent().map(Incumbent::objective);
        Self {
            slots,
            objective,
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn slots(&self) -> &[SlotIndex] {
        &self.slots
    }

    #[inline]
    pub fn into_slots(self) -> Vec<SlotIndex> {
        self.slots
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Meetings for a cover, attendees for budgeted coverage.
    #[inline]
    pub fn objective(&self) -> Option<i64> {
        self.objective
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// `false` when a limit stopped the search before it finished.
    #[inline]
    pub fn is_proven(&self) -> bool {
        !matches!(self.termination_reason, TerminationReason::Aborted(_))
    }

    #[inline]
    pub fn is_proven_optimal(&self) -> bool {
        matches!(
            self.termination_reason,
            TerminationReason::OptimalityProven
        )
    }

    #[inline]
    pub fn is_proven_infeasible(&self) -> bool {
        matches!(
            self.termination_reason,
            TerminationReason::InfeasibilityProven
        )
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", slot.get())?;
        }
        write!(f, "]")?;
        match self.objective {
            Some(objective) => write!(f, " objective {}", objective)?,
            None => write!(f, " no solution")?,
        }
        write!(f, " ({})", self.termination_reason)
    }
}
