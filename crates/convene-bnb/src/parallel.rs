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

//! Parallel frontier search
//!
//! The root is expanded breadth-first into an ordered frontier of subtree
//! roots. A fractional node is replaced in place by its 0-child and
//! 1-child, so the frontier lists subtrees in the order a sequential
//! depth-first search would visit them. Each frontier node gets its
//! position as ordinal.
//!
//! Scoped worker threads then pull frontier nodes in ordinal order and
//! search each subtree depth-first against a `SharedIncumbent`. Ties on
//! the objective go to the smaller ordinal, which makes the returned
//! incumbent identical to the one a sequential search returns.
//!
//! Cancellation is cooperative: every worker runs an `InterruptMonitor` on
//! a shared stop flag next to its own monitors. The first worker to abort
//! or fail raises the flag and records why.

use crate::{
    bnb::{BnbSolver, SubtreeEnd, SubtreeSearch, checked_objective, round_bound},
    branching::BranchingRule,
    cardinality::{CardinalityConstraint, detect_cardinality_constraints},
    error::BnbError,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        tree_search_monitor::TreeSearchMonitor,
    },
    node::Node,
    result::BnbSolverOutcome,
    stats::BnbSolverStatistics,
};
use convene_lp::relaxation::{LinearRelaxation, RelaxationStatus};
use convene_model::problem::Problem;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Frontier nodes created per worker before the workers start.
const FRONTIER_NODES_PER_THREAD: usize = 4;

/// A frontier entry; `settled` nodes are integral and need no split.
struct FrontierEntry {
    node: Node,
    settled: bool,
}

/// What a worker thread hands back.
struct WorkerReport {
    stats: BnbSolverStatistics,
}

/// The first reason any worker stopped early.
#[derive(Default)]
struct StopRecord {
    abort_reason: Option<String>,
    error: Option<BnbError>,
}

impl<R, B> BnbSolver<R, B>
where
    R: LinearRelaxation + Sync,
    B: BranchingRule + Sync,
{
    /// Solves `problem` with `num_threads` workers.
    ///
    /// `make_monitor` builds the monitor of each worker from its index. It
    /// runs on the worker's thread, so the monitor need not be `Send`. With
    /// `num_threads <= 1` this is `solve` with the monitor of worker 0.
    ///
    /// # Errors
    ///
    /// Returns the first `BnbError` any worker hits; all other workers are
    /// stopped.
    pub fn solve_parallel<F, M>(
        &self,
        problem: &Problem,
        num_threads: usize,
        make_monitor: F,
    ) -> Result<BnbSolverOutcome, BnbError>
    where
        F: Fn(usize) -> M + Sync,
        M: TreeSearchMonitor,
    {
        if num_threads <= 1 {
            return self.solve(problem, make_monitor(0));
        }

        let start_time = std::time::Instant::now();
        let cardinality = detect_cardinality_constraints(problem);
        let mut stats = BnbSolverStatistics::default();

        let frontier = self.expand_frontier(
            problem,
            &cardinality,
            num_threads * FRONTIER_NODES_PER_THREAD,
            &mut stats,
        )?;
        tracing::debug!(
            frontier = frontier.len(),
            threads = num_threads,
            "frontier expanded"
        );
        if frontier.is_empty() {
            stats.set_total_time(start_time.elapsed());
            return Ok(BnbSolverOutcome::infeasible(stats));
        }

        let shared = SharedIncumbent::new(problem.sense());
        let stop_flag = AtomicBool::new(false);
        let stop_record = Mutex::new(StopRecord::default());
        let next_index = AtomicUsize::new(0);
        let num_workers = num_threads.min(frontier.len());

        let reports = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..num_workers)
                .map(|worker| {
                    let (frontier, cardinality) = (&frontier, &cardinality);
                    let (shared, stop_flag) = (&shared, &stop_flag);
                    let (stop_record, next_index) = (&stop_record, &next_index);
                    let make_monitor = &make_monitor;
                    scope.spawn(move || {
                        let mut monitor = CompositeTreeSearchMonitor::with_capacity(2);
                        monitor.add_monitor(InterruptMonitor::new(stop_flag));
                        monitor.add_monitor(make_monitor(worker));

                        let mut stats = BnbSolverStatistics::default();
                        monitor.on_enter_search(problem, &stats);

                        loop {
                            let index = next_index.fetch_add(1, Ordering::Relaxed);
                            let Some(root) = frontier.get(index) else {
                                break;
                            };
                            let mut search = SubtreeSearch::new(
                                self,
                                problem,
                                cardinality,
                                &mut monitor,
                                shared,
                                &mut stats,
                            );
                            match search.run(root.clone()) {
                                Ok((_, SubtreeEnd::Exhausted)) => {}
                                Ok((_, SubtreeEnd::Aborted(reason))) => {
                                    let mut record = stop_record.lock();
                                    record.abort_reason.get_or_insert(reason);
                                    stop_flag.store(true, Ordering::Relaxed);
                                    break;
                                }
                                Err(error) => {
                                    let mut record = stop_record.lock();
                                    record.error.get_or_insert(error);
                                    stop_flag.store(true, Ordering::Relaxed);
                                    break;
                                }
                            }
                        }

                        monitor.on_exit_search(&stats);
                        WorkerReport { stats }
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle
                        .join()
                        .map_err(|_| BnbError::WorkerPanicked { worker })
                })
                .collect::<Vec<_>>()
        });

        for report in reports {
            stats.merge(&report?.stats);
        }
        stats.set_total_time(start_time.elapsed());

        let record = stop_record.into_inner();
        if let Some(error) = record.error {
            tracing::warn!(%error, "parallel branch-and-bound search failed");
            return Err(error);
        }

        let incumbent = shared.into_inner();
        tracing::debug!(
            nodes = stats.nodes_explored,
            relaxations = stats.relaxations_solved,
            objective = ?incumbent.as_ref().map(|i| i.objective()),
            "parallel branch-and-bound search finished"
        );
        Ok(match record.abort_reason {
            Some(reason) => BnbSolverOutcome::aborted(incumbent, reason, stats),
            None => BnbSolverOutcome::exhausted(incumbent, stats),
        })
    }

    /// Splits fractional nodes level by level until the frontier holds at
    /// least `target` nodes or nothing is left to split.
    ///
    /// Nothing is pruned by bound here; infeasible nodes are dropped and
    /// integral ones kept for the workers to install.
    fn expand_frontier(
        &self,
        problem: &Problem,
        cardinality: &[CardinalityConstraint],
        target: usize,
        stats: &mut BnbSolverStatistics,
    ) -> Result<Vec<Node>, BnbError> {
        let options = self.options();
        let mut frontier = vec![FrontierEntry {
            node: Node::root(problem),
            settled: false,
        }];

        while frontier.len() < target && frontier.iter().any(|e| !e.settled) {
            let mut next = Vec::with_capacity(frontier.len() * 2);
            for entry in frontier {
                if entry.settled {
                    next.push(entry);
                    continue;
                }
                let node = entry.node;
                stats.on_node_explored();
                stats.on_depth_update(node.depth() as u64);

                if cardinality.iter().any(|c| !c.is_reachable(node.fixings())) {
                    stats.on_pruning_cardinality();
                    continue;
                }

                let relaxation = self
                    .relaxation()
                    .solve(problem, node.fixings())
                    .map_err(|source| BnbError::Relaxation {
                        depth: node.depth(),
                        source,
                    })?;
                stats.on_relaxation_solved(relaxation.iterations());

                let objective = match relaxation.status() {
                    RelaxationStatus::Infeasible => {
                        stats.on_pruning_infeasible();
                        continue;
                    }
                    RelaxationStatus::Unbounded => {
                        return Err(BnbError::UnboundedRelaxation {
                            depth: node.depth(),
                        });
                    }
                    RelaxationStatus::Optimal => {
                        checked_objective(problem, &relaxation, node.depth())?
                    }
                };
                let bound = round_bound(problem.sense(), objective, options.bound_tolerance);
                if node.is_root() {
                    stats.set_root_bound(bound);
                }

                if relaxation.is_integral(options.integrality_tolerance) {
                    next.push(FrontierEntry {
                        node,
                        settled: true,
                    });
                    continue;
                }

                let variable = self
                    .branching()
                    .select(
                        problem,
                        relaxation.values(),
                        node.fixings(),
                        options.integrality_tolerance,
                    )
                    .ok_or(BnbError::NoBranchingCandidate {
                        depth: node.depth(),
                    })?;
                stats.on_branching();
                next.push(FrontierEntry {
                    node: node.child(variable, false, bound),
                    settled: false,
                });
                next.push(FrontierEntry {
                    node: node.child(variable, true, bound),
                    settled: false,
                });
            }
            frontier = next;
        }

        Ok(frontier
            .into_iter()
            .enumerate()
            .map(|(ordinal, entry)| {
                let mut node = entry.node;
                node.set_ordinal(ordinal);
                node
            })
            .collect())
    }
}
