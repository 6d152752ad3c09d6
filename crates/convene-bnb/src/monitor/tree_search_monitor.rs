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

//! Tree search monitoring interface
//!
//! Declares the `TreeSearchMonitor` trait, `SearchCommand` and `PruneReason`
//! for observing and controlling branch-and-bound. Callbacks follow the life
//! of each node, and a monitor can stop the search through
//! `search_command` (default: `Continue`).
//!
//! Lifecycle
//! - enter -> per node: command, step -> {prune | bound -> {solution | branch}} -> exit
//! - `BnbSolverStatistics` is passed to every callback.
//!
//! Methods take `&mut self`; a monitor belongs to one search thread. Keep
//! callbacks cheap, they run once per node.

use crate::{incumbent::Incumbent, node::Node, stats::BnbSolverStatistics};
use convene_model::{index::VariableIndex, problem::Problem};

/// What the search should do next.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub enum SearchCommand {
    #[default]
    Continue,
    Terminate(String),
}

/// Reasons for discarding a node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PruneReason {
    /// The relaxation of the node is infeasible.
    Infeasible,
    /// The node's bound cannot beat the incumbent.
    BoundDominated,
    /// A cardinality constraint can no longer be met.
    Cardinality,
}

/// Trait for monitoring and controlling the search process of the solver.
pub trait TreeSearchMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts.
    fn on_enter_search(&mut self, problem: &Problem, statistics: &BnbSolverStatistics);
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics);
    /// Called before a node is processed to decide whether to go on.
    fn search_command(&mut self, _node: &Node, _statistics: &BnbSolverStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called when a node is taken from the stack.
    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics);
    /// Called when the rounded relaxation bound of a node is known.
    fn on_bound_computed(&mut self, node: &Node, bound: i64, statistics: &BnbSolverStatistics);
    /// Called when a node is discarded.
    fn on_prune(&mut self, node: &Node, reason: PruneReason, statistics: &BnbSolverStatistics);
    /// Called when a node is split on `variable`.
    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics);
    /// Called when a new incumbent is installed.
    fn on_solution_found(&mut self, incumbent: &Incumbent, statistics: &BnbSolverStatistics);
}

impl std::fmt::Debug for dyn TreeSearchMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<M> TreeSearchMonitor for &mut M
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, problem: &Problem, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(problem, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, node: &Node, statistics: &BnbSolverStatistics) -> SearchCommand {
        (**self).search_command(node, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        (**self).on_step(node, statistics)
    }

    #[inline(always)]
    fn on_bound_computed(&mut self, node: &Node, bound: i64, statistics: &BnbSolverStatistics) {
        (**self).on_bound_computed(node, bound, statistics)
    }

    #[inline(always)]
    fn on_prune(&mut self, node: &Node, reason: PruneReason, statistics: &BnbSolverStatistics) {
        (**self).on_prune(node, reason, statistics)
    }

    #[inline(always)]
    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics) {
        (**self).on_branch(node, variable, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, incumbent: &Incumbent, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(incumbent, statistics)
    }
}

impl<M> TreeSearchMonitor for Box<M>
where
    M: TreeSearchMonitor + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(&mut self, problem: &Problem, statistics: &BnbSolverStatistics) {
        (**self).on_enter_search(problem, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, node: &Node, statistics: &BnbSolverStatistics) -> SearchCommand {
        (**self).search_command(node, statistics)
    }

    #[inline(always)]
    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        (**self).on_step(node, statistics)
    }

    #[inline(always)]
    fn on_bound_computed(&mut self, node: &Node, bound: i64, statistics: &BnbSolverStatistics) {
        (**self).on_bound_computed(node, bound, statistics)
    }

    #[inline(always)]
    fn on_prune(&mut self, node: &Node, reason: PruneReason, statistics: &BnbSolverStatistics) {
        (**self).on_prune(node, reason, statistics)
    }

    #[inline(always)]
    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics) {
        (**self).on_branch(node, variable, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, incumbent: &Incumbent, statistics: &BnbSolverStatistics) {
        (**self).on_solution_found(incumbent, statistics)
    }
}
