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

//! # Meeting-Slot Solver
//!
//! The configured front door to exact slot selection. A `Solver` formulates
//! an `AttendanceMatrix` for a `CoverageMode`, runs the branch-and-bound
//! engine over the bounded simplex relaxation and returns a `Selection`.
//!
//! ## Configuration
//!
//! `SolverBuilder` sets optional time and node limits, the number of worker
//! threads, the simplex tolerances and an optional progress log interval.
//! Each worker gets its own monitor stack built from these settings, so both
//! limits apply per worker and the time limit counts from when the worker
//! starts.
//!
//! The defaults (no limits, one thread) always prove the result, and the
//! result does not depend on the thread count.
//!
//! ## Usage
//!
//! ```rust
//! use convene_model::{formulate::CoverageMode, matrix::AttendanceMatrix};
//! use convene_solver::solver::SolverBuilder;
//!
//! let matrix = AttendanceMatrix::from_binary_rows(&[
//!     vec![1, 1, 0],
//!     vec![0, 1, 1],
//!     vec![1, 0, 1],
//! ])
//! .unwrap();
//!
//! let solver = SolverBuilder::new().with_threads(2).build();
//! let selection = solver.solve(&matrix, CoverageMode::MinimumCover).unwrap();
//! assert_eq!(selection.len(), 2);
//! assert!(selection.is_proven_optimal());
//! ```

use crate::{error::SolveError, selection::Selection};
use convene_bnb::{
    bnb::{BnbOptions, BnbSolver},
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogMonitor, node_limit::NodeLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
};
use convene_lp::{options::SimplexOptions, simplex::BoundedSimplex};
use convene_model::{
    formulate::{CoverageMode, formulate},
    index::SlotIndex,
    matrix::AttendanceMatrix,
};
use std::time::Duration;

/// Clock checks of the progress log happen every this many nodes plus one.
const LOG_CLOCK_CHECK_MASK: u64 = 0x3F;

/// A configured exact slot-selection solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Solver {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    num_threads: usize,
    simplex_options: SimplexOptions,
    log_interval: Option<Duration>,
}

impl Default for Solver {
    #[inline]
    fn default() -> Self {
        SolverBuilder::new().build()
    }
}

impl Solver {
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    #[inline]
    pub fn simplex_options(&self) -> &SimplexOptions {
        &self.simplex_options
    }

    #[inline]
    pub fn log_interval(&self) -> Option<Duration> {
        self.log_interval
    }

    /// Selects slots from `matrix` according to `mode`.
    ///
    /// # Errors
    ///
    /// `SolveError::InvalidInput` if the budget of `mode` exceeds the number
    /// of slots, `SolveError::InternalSolverError` if the search fails.
    pub fn solve(
        &self,
        matrix: &AttendanceMatrix,
        mode: CoverageMode,
    ) -> Result<Selection, SolveError> {
        let problem = formulate(matrix, mode)?;
        tracing::debug!(
            %mode,
            slots = matrix.num_slots(),
            entities = matrix.num_entities(),
            threads = self.num_threads,
            "solving attendance problem"
        );

        let relaxation = BoundedSimplex::with_options(self.simplex_options);
        let engine = BnbSolver::new(relaxation).with_options(BnbOptions {
            integrality_tolerance: self.simplex_options.integrality_tolerance,
            feasibility_tolerance: self.simplex_options.feasibility_tolerance,
            ..BnbOptions::default()
        });

        let outcome = engine.solve_parallel(&problem, self.num_threads, |_| self.build_monitor())?;
        if !outcome.is_proven() {
            tracing::info!(
                reason = %outcome.termination_reason(),
                "search stopped before proving the result"
            );
        }
        Ok(Selection::from_outcome(&problem, outcome))
    }

    fn build_monitor(&self) -> CompositeTreeSearchMonitor<'static> {
        let mut monitor = CompositeTreeSearchMonitor::with_capacity(3);
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        if let Some(limit) = self.node_limit {
            monitor.add_monitor(NodeLimitMonitor::new(limit));
        }
        if let Some(interval) = self.log_interval {
            monitor.add_monitor(LogMonitor::new(interval, LOG_CLOCK_CHECK_MASK));
        }
        monitor
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverBuilder {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    num_threads: usize,
    simplex_options: SimplexOptions,
    log_interval: Option<Duration>,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            node_limit: None,
            num_threads: 1,
            simplex_options: SimplexOptions::default(),
            log_interval: None,
        }
    }

    /// An aborted search returns its best selection marked as unproven.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// `0` is treated as `1`, the sequential search.
    #[inline]
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads.max(1);
        self
    }

    #[inline]
    pub fn with_simplex_options(mut self, options: SimplexOptions) -> Self {
        self.simplex_options = options;
        self
    }

    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            time_limit: self.time_limit,
            node_limit: self.node_limit,
            num_threads: self.num_threads,
            simplex_options: self.simplex_options,
            log_interval: self.log_interval,
        }
    }
}

/// Fewest slots such that every entity attends at least one.
///
/// Empty if some entity attends no slot at all.
///
/// # Errors
///
/// `SolveError::InternalSolverError` if the search fails.
pub fn minimize_meetings(matrix: &AttendanceMatrix) -> Result<Vec<SlotIndex>, SolveError> {
    Solver::default()
        .solve(matrix, CoverageMode::MinimumCover)
        .map(Selection::into_slots)
}

/// Exactly `k` slots maximizing the number of entities that attend one.
///
/// # Errors
///
/// `SolveError::InvalidInput` if `k` exceeds the number of slots,
/// `SolveError::InternalSolverError` if the search fails.
pub fn maximize_attendance(
    matrix: &AttendanceMatrix,
    k: usize,
) -> Result<Vec<SlotIndex>, SolveError> {
    Solver::default()
        .solve(matrix, CoverageMode::BudgetedCoverage { budget: k })
        .map(Selection::into_slots)
}
