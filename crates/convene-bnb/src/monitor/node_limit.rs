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
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use convene_model::{index::VariableIndex, problem::Problem};

/// A monitor that terminates the search once it has explored a number of
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitMonitor {
    node_limit: u64,
}

impl NodeLimitMonitor {
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self { node_limit }
    }

    #[inline]
    pub fn node_limit(&self) -> u64 {
        self.node_limit
    }
}

impl TreeSearchMonitor for NodeLimitMonitor {
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn search_command(&mut self, _node: &Node, stats: &BnbSolverStatistics) -> SearchCommand {
        if stats.nodes_explored >= self.node_limit {
            SearchCommand::Terminate(format!("Node limit of {} reached", self.node_limit))
        } else {
            SearchCommand::Continue
        }
    }

    fn on_enter_search(&mut self, _problem: &Problem, _stats: &BnbSolverStatistics) {}
    fn on_exit_search(&mut self, _stats: &BnbSolverStatistics) {}
    fn on_step(&mut self, _node: &Node, _stats: &BnbSolverStatistics) {}
    fn on_bound_computed(&mut self, _node: &Node, _bound: i64, _stats: &BnbSolverStatistics) {}
    fn on_prune(&mut self, _node: &Node, _reason: PruneReason, _stats: &BnbSolverStatistics) {}
    fn on_branch(&mut self, _node: &Node, _variable: VariableIndex, _stats: &BnbSolverStatistics) {}
    fn on_solution_found(&mut self, _incumbent: &Incumbent, _stats: &BnbSolverStatistics) {}
}
