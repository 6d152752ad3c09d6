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
use std::time::{Duration, Instant};

/// A monitor that terminates the search after a specified duration.
///
/// The clock is read only every `clock_check_mask + 1` commands. Each node
/// costs a relaxation solve, so the default mask is small.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start_time: Option<Instant>,
    clock_check_mask: u64,
    steps: u64,
}

impl TimeLimitMonitor {
    /// Creates a monitor that reads the clock every 16 nodes.
    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, 0x0F)
    }

    /// `clock_check_mask` should be one less than a power of two.
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            time_limit,
            start_time: None,
            clock_check_mask,
            steps: 0,
        }
    }

    #[inline]
    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

impl TreeSearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _problem: &Problem, _stats: &BnbSolverStatistics) {
        self.start_time = Some(Instant::now());
        self.steps = 0;
    }

    fn on_exit_search(&mut self, _stats: &BnbSolverStatistics) {
        self.start_time = None;
    }

    fn search_command(&mut self, _node: &Node, _stats: &BnbSolverStatistics) -> SearchCommand {
        let step = self.steps;
        self.steps = self.steps.wrapping_add(1);
        if step & self.clock_check_mask != 0 {
            return SearchCommand::Continue;
        }

        if let Some(start) = self.start_time
            && start.elapsed() >= self.time_limit
        {
            return SearchCommand::Terminate(format!(
                "Time limit of {:?} exceeded",
                self.time_limit
            ));
        }
        SearchCommand::Continue
    }

    fn on_step(&mut self, _node: &Node, _stats: &BnbSolverStatistics) {}
    fn on_bound_computed(&mut self, _node: &Node, _bound: i64, _stats: &BnbSolverStatistics) {}
    fn on_prune(&mut self, _node: &Node, _reason: PruneReason, _stats: &BnbSolverStatistics) {}
    fn on_branch(&mut self, _node: &Node, _variable: VariableIndex, _stats: &BnbSolverStatistics) {}
    fn on_solution_found(&mut self, _incumbent: &Incumbent, _stats: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_model::fixing::VariableFixings;

    #[test]
    fn test_zero_limit_terminates_on_first_check() {
        let node = Node::with_fixings(VariableFixings::new(1), 0, 0);
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO);

        // Not started yet: no clock to compare against.
        assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);

        monitor.start_time = Some(Instant::now());
        monitor.steps = 0;
        assert!(matches!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_clock_is_skipped_between_checks() {
        let node = Node::with_fixings(VariableFixings::new(1), 0, 0);
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::ZERO, 0x03);
        monitor.start_time = Some(Instant::now());
        monitor.steps = 1;

        for _ in 0..3 {
            assert_eq!(monitor.search_command(&node, &stats), SearchCommand::Continue);
        }
        assert!(matches!(
            monitor.search_command(&node, &stats),
            SearchCommand::Terminate(_)
        ));
        assert_eq!(monitor.time_limit(), Duration::ZERO);
    }
}
