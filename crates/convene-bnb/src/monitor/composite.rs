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

//! Fan-out monitor
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children in
//! insertion order. `search_command` returns the first non-`Continue`
//! answer, so put the strictest stop conditions first.

use crate::{
    incumbent::Incumbent,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::Node,
    stats::BnbSolverStatistics,
};
use convene_model::{index::VariableIndex, problem::Problem};

/// A tree search monitor that forwards events to a list of monitors.
#[derive(Default)]
pub struct CompositeTreeSearchMonitor<'a> {
    monitors: Vec<Box<dyn TreeSearchMonitor + 'a>>,
}

impl<'a> CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeTreeSearchMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter()).finish()
    }
}

impl<'a> FromIterator<Box<dyn TreeSearchMonitor + 'a>> for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a> TreeSearchMonitor for CompositeTreeSearchMonitor<'a> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, problem: &Problem, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(problem, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(&mut self, node: &Node, statistics: &BnbSolverStatistics) -> SearchCommand {
        for monitor in &mut self.monitors {
            let command = monitor.search_command(node, statistics);
            if !matches!(command, SearchCommand::Continue) {
                return command;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, node: &Node, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(node, statistics);
        }
    }

    #[inline(always)]
    fn on_bound_computed(&mut self, node: &Node, bound: i64, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_bound_computed(node, bound, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(&mut self, node: &Node, reason: PruneReason, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_prune(node, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_branch(&mut self, node: &Node, variable: VariableIndex, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_branch(node, variable, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, incumbent: &Incumbent, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(incumbent, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        interrupt::InterruptMonitor, no_op::NoOperationMonitor, node_limit::NodeLimitMonitor,
    };
    use convene_model::fixing::VariableFixings;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_first_terminate_wins() {
        let flag = AtomicBool::new(true);
        let node = Node::with_fixings(VariableFixings::new(1), 0, 0);
        let mut stats = BnbSolverStatistics::default();
        stats.on_node_explored();

        let mut composite = CompositeTreeSearchMonitor::with_capacity(3);
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(NodeLimitMonitor::new(1));
        composite.add_monitor(InterruptMonitor::new(&flag));
        assert_eq!(composite.len(), 3);

        assert_eq!(
            composite.search_command(&node, &stats),
            SearchCommand::Terminate("Node limit of 1 reached".to_string())
        );
    }

    #[test]
    fn test_empty_composite_continues() {
        let node = Node::with_fixings(VariableFixings::new(1), 0, 0);
        let stats = BnbSolverStatistics::default();
        let mut composite: CompositeTreeSearchMonitor<'_> =
            std::iter::empty::<Box<dyn TreeSearchMonitor>>().collect();
        assert!(composite.is_empty());
        assert_eq!(composite.search_command(&node, &stats), SearchCommand::Continue);
    }
}
