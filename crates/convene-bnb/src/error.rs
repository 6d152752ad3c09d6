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

use convene_lp::error::LpError;
use convene_model::index::{ConstraintIndex, VariableIndex};

/// Internal faults that stop a branch-and-bound search.
///
/// Every variant means the search could not certify its answer. None of
/// them is ever turned into a pruned node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BnbError {
    /// The relaxation solver failed on a node.
    #[error("relaxation failed at depth {depth}: {source}")]
    Relaxation {
        depth: usize,
        #[source]
        source: LpError,
    },
    /// The relaxation of a bounded 0/1 program claimed unboundedness.
    #[error("relaxation reported an unbounded 0/1 program at depth {depth}")]
    UnboundedRelaxation { depth: usize },
    /// An optimal relaxation point has the wrong number of values.
    #[error("relaxation at depth {depth} returned {found} values for {expected} variables")]
    RelaxationDimensionMismatch {
        depth: usize,
        expected: usize,
        found: usize,
    },
    /// An optimal relaxation point holds a NaN or infinite value.
    #[error("relaxation at depth {depth} returned a non-finite value for {variable}")]
    NonFiniteRelaxationValue {
        depth: usize,
        variable: VariableIndex,
    },
    /// An integral relaxation point failed the exact feasibility check.
    #[error("integral relaxation point violates {constraint}")]
    InvalidIncumbent { constraint: ConstraintIndex },
    /// A fractional relaxation point offered nothing to branch on.
    #[error("fractional relaxation point at depth {depth} has no free fractional variable")]
    NoBranchingCandidate { depth: usize },
    /// A search worker panicked.
    #[error("search worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}
