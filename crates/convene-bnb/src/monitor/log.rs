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

use crate::{
    incumbent::Incumbent,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use convene_model::{index::VariableIndex, problem::Problem};
use std::time::{Duration, Instant};

/// Emits periodic progress lines through `tracing`.
///
/// The clock is read only when `nodes_explored & clock_check_mask == 0`,
/// so the mask should be one less than a power of two.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<i64>,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    #[inline(always)]
    fn log_line(&mut self, node: &Node, stats: &BnbSolverStatistics) {
        let now = Instant::now();
        tracing::info!(
            elapsed = ?now.duration_since(self.start_time),
            nodes = stats.nodes_explored,
            relaxations = stats.relaxations_solved,
            depth = node.depth(),
            best = ?self.best_objective,
            pruned = stats.prunings(),
            "branch-and-bound progress"
        );
        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 0xFF)
    }
}

impl TreeSearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, problem: &Problem, _stats: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_objective = None;
        tracing::info!(
            variables = problem.num_variables(),
            constraints = problem.num_constraints(),
            sense = %problem.sense(),
            "branch-and-bound search started"
        );
    }

    fn on_exit_search(&mut self, stats: &BnbSolverStatistics) {
        tracing::info!(
            elapsed = ?self.start_time.elapsed(),
            nodes = stats.nodes_explored,
            relaxations = stats.relaxations_solved,
            solutions = stats.solutions_found,
            best = ?self.best_objective,
            "branch-and-bound search finished"
        );
    }

    fn on_step(&mut self, node: &Node, stats: &BnbSolverStatistics) {
        if (stats.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(node, stats);
        }
    }

    fn on_bound_computed(&mut self, node: &Node, bound: i64, _stats: &BnbSolverStatistics) {
        if node.is_root() {
            tracing::info!(bound, "root relaxation solved");
        }
    }

    fn on_prune(&mut self, _node: &Node, _reason: PruneReason, _stats: &BnbSolverStatistics) {}

    fn on_branch(&mut self, _node: &Node, _variable: VariableIndex, _stats: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, incumbent: &Incumbent, stats: &BnbSolverStatistics) {
        self.best_objective = Some(incumbent.objective());
        tracing::info!(
            objective = incumbent.objective(),
            nodes = stats.nodes_explored,
            "new incumbent"
        );
    }
}
