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

use crate::{incumbent::Incumbent, stats::BnbSolverStatistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult {
    /// We have proven that the program is infeasible.
    Infeasible,
    /// We have found an incumbent and proven its optimality.
    Optimal(Incumbent),
    /// We have found an incumbent, but not proven its optimality.
    Feasible(Incumbent),
    /// The search stopped without an incumbent and without proving
    /// infeasibility.
    Unknown,
}

impl SolverResult {
    /// The incumbent, optimal or not.
    #[inline]
    pub fn incumbent(&self) -> Option<&Incumbent> {
        match self {
            SolverResult::Optimal(incumbent) | SolverResult::Feasible(incumbent) => Some(incumbent),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(incumbent) => {
                write!(f, "Optimal(objective={})", incumbent.objective())
            }
            SolverResult::Feasible(incumbent) => {
                write!(f, "Feasible(objective={})", incumbent.objective())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The search found and proved optimality of an incumbent.
    OptimalityProven,
    /// The search proved that the program is infeasible.
    InfeasibilityProven,
    /// A monitor stopped the search (time, node limit, interrupt).
    /// The string carries the monitor's reason.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of the solver after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome {
    result: SolverResult,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl BnbSolverOutcome {
    #[inline]
    pub fn optimal(incumbent: Incumbent, statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Optimal(incumbent),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    #[inline]
    pub fn infeasible(statistics: BnbSolverStatistics) -> Self {
        Self {
            result: SolverResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    #[inline]
    pub fn aborted<R>(
        incumbent: Option<Incumbent>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match incumbent {
            Some(incumbent) => SolverResult::Feasible(incumbent),
            None => SolverResult::Unknown,
        };

        Self {
            result,
            termination_reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Builds the outcome of an exhausted search.
    #[inline]
    pub fn exhausted(incumbent: Option<Incumbent>, statistics: BnbSolverStatistics) -> Self {
        match incumbent {
            Some(incumbent) => Self::optimal(incumbent, statistics),
            None => Self::infeasible(statistics),
        }
    }

    #[inline]
    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Returns `true` if the search ran to completion.
    #[inline]
    pub fn is_proven(&self) -> bool {
        !matches!(self.termination_reason, TerminationReason::Aborted(_))
    }

    #[inline]
    pub fn into_parts(self) -> (SolverResult, TerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for BnbSolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.result, self.termination_reason)
    }
}
