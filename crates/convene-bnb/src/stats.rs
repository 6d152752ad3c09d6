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

use std::time::Duration;

/// Statistics collected during a branch-and-bound search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BnbSolverStatistics {
    /// Nodes popped from the stack.
    pub nodes_explored: u64,
    /// Relaxations solved, one per node that survived the cheap checks.
    pub relaxations_solved: u64,
    /// Simplex pivots and bound flips across all relaxations.
    pub simplex_iterations: u64,
    /// Nodes split into two children.
    pub branchings: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Pruned because the relaxation was infeasible.
    pub prunings_infeasible: u64,
    /// Pruned because the bound could not beat the incumbent. Counts both
    /// the check against the parent bound and the check after solving.
    pub prunings_bound: u64,
    /// Pruned because a cardinality constraint could no longer be met.
    pub prunings_cardinality: u64,
    /// Incumbents installed during the search.
    pub solutions_found: u64,
    /// Total time spent in the solver.
    pub time_total: Duration,
    /// Rounded relaxation bound of the root node, if it was solved.
    pub root_bound: Option<i64>,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
    }

    #[inline]
    pub fn on_relaxation_solved(&mut self, iterations: usize) {
        self.relaxations_solved = self.relaxations_solved.saturating_add(1);
        self.simplex_iterations = self.simplex_iterations.saturating_add(iterations as u64);
    }

    #[inline]
    pub fn on_branching(&mut self) {
        self.branchings = self.branchings.saturating_add(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_cardinality(&mut self) {
        self.prunings_cardinality = self.prunings_cardinality.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_bound(&mut self, bound: i64) {
        self.root_bound = Some(bound);
    }

    /// Total prunings of any kind.
    #[inline]
    pub fn prunings(&self) -> u64 {
        self.prunings_infeasible
            .saturating_add(self.prunings_bound)
            .saturating_add(self.prunings_cardinality)
    }

    /// Folds the counters of another search into these.
    ///
    /// Times are not added: workers run concurrently, so the caller sets
    /// the wall-clock total. The root bound is kept if already set.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.relaxations_solved = self
            .relaxations_solved
            .saturating_add(other.relaxations_solved);
        self.simplex_iterations = self
            .simplex_iterations
            .saturating_add(other.simplex_iterations);
        self.branchings = self.branchings.saturating_add(other.branchings);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_infeasible = self
            .prunings_infeasible
            .saturating_add(other.prunings_infeasible);
        self.prunings_bound = self.prunings_bound.saturating_add(other.prunings_bound);
        self.prunings_cardinality = self
            .prunings_cardinality
            .saturating_add(other.prunings_cardinality);
        self.solutions_found = self.solutions_found.saturating_add(other.solutions_found);
        if self.root_bound.is_none() {
            self.root_bound = other.root_bound;
        }
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Convene-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:         {}", self.nodes_explored)?;
        writeln!(f, "  Relaxations solved:     {}", self.relaxations_solved)?;
        writeln!(f, "  Simplex iterations:     {}", self.simplex_iterations)?;
        writeln!(f, "  Branchings:             {}", self.branchings)?;
        writeln!(f, "  Max depth reached:      {}", self.max_depth)?;
        writeln!(f, "  Prunings (infeasible):  {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):       {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (cardinality): {}", self.prunings_cardinality)?;
        writeln!(f, "  Solutions found:        {}", self.solutions_found)?;
        match self.root_bound {
            Some(bound) => writeln!(f, "  Root bound:             {}", bound)?,
            None => writeln!(f, "  Root bound:             -")?,
        }
        writeln!(f, "  Total time:             {:.2?}", self.time_total)?;
        Ok(())
    }
}
