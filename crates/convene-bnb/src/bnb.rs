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

//! Branch-and-bound over 0/1 integer programs.
//!
//! `BnbSolver` explores the tree of partial assignments depth-first from an
//! explicit stack. Every node is bounded by the continuous relaxation with
//! its fixings, and the bound is rounded to the next integer in the
//! pessimistic direction because objective coefficients are integral.
//!
//! A node is discarded when
//! - its parent's bound cannot beat the incumbent,
//! - a detected cardinality constraint can no longer be met,
//! - its relaxation is infeasible,
//! - or its own bound cannot beat the incumbent.
//!
//! An integral relaxation point is validated exactly against every
//! constraint and installed if it strictly improves the incumbent.
//! Otherwise the node is split on the variable chosen by the
//! `BranchingRule`; the 1-child is pushed first so that the 0-child is
//! explored first. Relaxation faults abort the search with an error and are
//! never mistaken for infeasibility.

use crate::{
    branching::{BranchingRule, MostFractionalBranching},
    cardinality::{CardinalityConstraint, detect_cardinality_constraints},
    error::BnbError,
    incumbent::{Incumbent, IncumbentStore, NoSharedIncumbent},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    node::Node,
    result::BnbSolverOutcome,
    stack::NodeStack,
    stats::BnbSolverStatistics,
};
use convene_lp::{
    error::LpError,
    options::DEFAULT_EPSILON,
    relaxation::{LinearRelaxation, Relaxation, RelaxationStatus},
};
use convene_model::{
    index::VariableIndex,
    problem::{Problem, Sense},
};

/// Tolerances of the search itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BnbOptions {
    /// Largest distance from 0 or 1 still treated as integral.
    pub integrality_tolerance: f64,
    /// Tolerance of the exact constraint check on rounded points.
    pub feasibility_tolerance: f64,
    /// Slack subtracted before rounding a relaxation bound.
    pub bound_tolerance: f64,
}

impl Default for BnbOptions {
    fn default() -> Self {
        Self {
            integrality_tolerance: DEFAULT_EPSILON,
            feasibility_tolerance: DEFAULT_EPSILON,
            bound_tolerance: DEFAULT_EPSILON,
        }
    }
}

/// Rounds a relaxation objective to the best integer objective it admits.
#[inline]
pub fn round_bound(sense: Sense, objective: f64, tolerance: f64) -> i64 {
    match sense {
        Sense::Minimize => (objective - tolerance).ceil() as i64,
        Sense::Maximize => (objective + tolerance).floor() as i64,
    }
}

/// Returns the objective of an optimal relaxation after checking that the
/// point can be trusted: a finite objective and one finite value per
/// variable.
pub(crate) fn checked_objective(
    problem: &Problem,
    relaxation: &Relaxation,
    depth: usize,
) -> Result<f64, BnbError> {
    let objective = relaxation
        .objective()
        .filter(|objective| objective.is_finite())
        .ok_or(BnbError::Relaxation {
            depth,
            source: LpError::NonFiniteObjective,
        })?;

    let values = relaxation.values();
    if values.len() != problem.num_variables() {
        return Err(BnbError::RelaxationDimensionMismatch {
            depth,
            expected: problem.num_variables(),
            found: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|value| !value.is_finite()) {
        return Err(BnbError::NonFiniteRelaxationValue {
            depth,
            variable: VariableIndex::new(index),
        });
    }
    Ok(objective)
}

/// A branch-and-bound engine over a `LinearRelaxation`.
///
/// The solver holds configuration only; every call to `solve` runs in its
/// own session, so one solver can serve many problems.
#[derive(Debug, Clone)]
pub struct BnbSolver<R, B = MostFractionalBranching> {
    relaxation: R,
    branching: B,
    options: BnbOptions,
}

impl<R> BnbSolver<R>
where
    R: LinearRelaxation,
{
    /// Creates a solver with most-fractional branching.
    #[inline]
    pub fn new(relaxation: R) -> Self {
        Self::with_branching(relaxation, MostFractionalBranching)
    }
}

impl<R, B> BnbSolver<R, B>
where
    R: LinearRelaxation,
    B: BranchingRule,
{
    #[inline]
    pub fn with_branching(relaxation: R, branching: B) -> Self {
        Self {
            relaxation,
            branching,
            options: BnbOptions::default(),
        }
    }

    #[inline]
    pub fn with_options(mut self, options: BnbOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn relaxation(&self) -> &R {
        &self.relaxation
    }

    #[inline]
    pub fn branching(&self) -> &B {
        &self.branching
    }

    #[inline]
    pub fn options(&self) -> &BnbOptions {
        &self.options
    }

    /// Solves `problem` as a standalone, single-threaded search.
    ///
    /// # Errors
    ///
    /// Returns `BnbError` if a relaxation fails or an integral point does
    /// not pass the exact feasibility check.
    pub fn solve<S>(&self, problem: &Problem, monitor: S) -> Result<BnbSolverOutcome, BnbError>
    where
        S: TreeSearchMonitor,
    {
        self.solve_internal(problem, monitor, &NoSharedIncumbent)
    }

    fn solve_internal<S, I>(
        &self,
        problem: &Problem,
        mut monitor: S,
        store: &I,
    ) -> Result<BnbSolverOutcome, BnbError>
    where
        S: TreeSearchMonitor,
        I: IncumbentStore,
    {
        let start_time = std::time::Instant::now();
        let cardinality = detect_cardinality_constraints(problem);
        let mut stats = BnbSolverStatistics::default();
        monitor.on_enter_search(problem, &stats);

        let end = {
            let mut session = SubtreeSearch::new(
                self,
                problem,
                &cardinality,
                &mut monitor,
                store,
                &mut stats,
            );
            session.run(Node::root(problem))
        };

        stats.set_total_time(start_time.elapsed());
        monitor.on_exit_search(&stats);

        let (incumbent, end) = match end {
            Ok(done) => done,
            Err(error) => {
                tracing::warn!(%error, "branch-and-bound search failed");
                return Err(error);
            }
        };
        tracing::debug!(
            nodes = stats.nodes_explored,
            relaxations = stats.relaxations_solved,
            objective = ?incumbent.as_ref().map(Incumbent::objective),
            "branch-and-bound search finished"
        );

        Ok(match end {
            SubtreeEnd::Exhausted => BnbSolverOutcome::exhausted(incumbent, stats),
            SubtreeEnd::Aborted(reason) => BnbSolverOutcome::aborted(incumbent, reason, stats),
        })
    }
}

/// How the search of one subtree ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubtreeEnd {
    /// Every node was explored or pruned.
    Exhausted,
    /// A monitor stopped the search.
    Aborted(String),
}

/// The depth-first search of one subtree.
///
/// Holds its own incumbent for the subtree; incumbents of other subtrees
/// only arrive through the `IncumbentStore`.
pub(crate) struct SubtreeSearch<'a, R, B, S, I> {
    relaxation: &'a R,
    branching: &'a B,
    options: &'a BnbOptions,
    problem: &'a Problem,
    cardinality: &'a [CardinalityConstraint],
    monitor: &'a mut S,
    store: &'a I,
    stats: &'a mut BnbSolverStatistics,
    stack: NodeStack,
    best: Option<Incumbent>,
}

impl<'a, R, B, S, I> SubtreeSearch<'a, R, B, S, I>
where
    R: LinearRelaxation,
    B: BranchingRule,
    S: TreeSearchMonitor,
    I: IncumbentStore,
{
    pub(crate) fn new(
        solver: &'a BnbSolver<R, B>,
        problem: &'a Problem,
        cardinality: &'a [CardinalityConstraint],
        monitor: &'a mut S,
        store: &'a I,
        stats: &'a mut BnbSolverStatistics,
    ) -> Self {
        Self {
            relaxation: &solver.relaxation,
            branching: &solver.branching,
            options: &solver.options,
            problem,
            cardinality,
            monitor,
            store,
            stats,
            stack: NodeStack::preallocated(problem.num_variables()),
            best: None,
        }
    }

    /// Searches the subtree below `root` and returns its best incumbent.
    pub(crate) fn run(
        &mut self,
        root: Node,
    ) -> Result<(Option<Incumbent>, SubtreeEnd), BnbError> {
        self.stack.push(root);

        let end = loop {
            let Some(node) = self.stack.pop() else {
                break SubtreeEnd::Exhausted;
            };

            if let SearchCommand::Terminate(reason) = self.monitor.search_command(&node, self.stats)
            {
                break SubtreeEnd::Aborted(reason);
            }

            self.stats.on_node_explored();
            self.stats.on_depth_update(node.depth() as u64);
            self.monitor.on_step(&node, self.stats);

            self.process(node)?;
        };

        self.stack.clear();
        Ok((self.best.take(), end))
    }

    /// Returns `true` if a node of this subtree with `bound` cannot produce
    /// an incumbent anyone would keep.
    #[inline]
    fn is_dominated(&self, bound: i64, ordinal: usize) -> bool {
        if let Some(best) = &self.best
            && !self.problem.sense().is_better(bound, best.objective())
        {
            return true;
        }
        self.store.dominates(bound, ordinal)
    }

    #[inline]
    fn prune(&mut self, node: &Node, reason: PruneReason) {
        match reason {
            PruneReason::Infeasible => self.stats.on_pruning_infeasible(),
            PruneReason::BoundDominated => self.stats.on_pruning_bound(),
            PruneReason::Cardinality => self.stats.on_pruning_cardinality(),
        }
        self.monitor.on_prune(node, reason, self.stats);
    }

    fn process(&mut self, node: Node) -> Result<(), BnbError> {
        if let Some(parent_bound) = node.parent_bound()
            && self.is_dominated(parent_bound, node.ordinal())
        {
            self.prune(&node, PruneReason::BoundDominated);
            return Ok(());
        }

        if self
            .cardinality
            .iter()
            .any(|c| !c.is_reachable(node.fixings()))
        {
            self.prune(&node, PruneReason::Cardinality);
            return Ok(());
        }

        let relaxation = self
            .relaxation
            .solve(self.problem, node.fixings())
            .map_err(|source| BnbError::Relaxation {
                depth: node.depth(),
                source,
            })?;
        self.stats.on_relaxation_solved(relaxation.iterations());

        let objective = match relaxation.status() {
            RelaxationStatus::Infeasible => {
                self.prune(&node, PruneReason::Infeasible);
                return Ok(());
            }
            RelaxationStatus::Unbounded => {
                return Err(BnbError::UnboundedRelaxation {
                    depth: node.depth(),
                });
            }
            RelaxationStatus::Optimal => {
                checked_objective(self.problem, &relaxation, node.depth())?
            }
        };

        let bound = round_bound(
            self.problem.sense(),
            objective,
            self.options.bound_tolerance,
        );
        if node.is_root() {
            self.stats.set_root_bound(bound);
        }
        self.monitor.on_bound_computed(&node, bound, self.stats);

        if self.is_dominated(bound, node.ordinal()) {
            self.prune(&node, PruneReason::BoundDominated);
            return Ok(());
        }

        if relaxation.is_integral(self.options.integrality_tolerance) {
            let assignment = relaxation.rounded();
            if let Some(constraint) = self
                .problem
                .first_violated(&assignment, self.options.feasibility_tolerance)
            {
                return Err(BnbError::InvalidIncumbent { constraint });
            }
            let objective = self.problem.objective_value(&assignment);
            self.install(Incumbent::new(objective, assignment, node.ordinal()));
            return Ok(());
        }

        let Some(variable) = self.branching.select(
            self.problem,
            relaxation.values(),
            node.fixings(),
            self.options.integrality_tolerance,
        ) else {
            return Err(BnbError::NoBranchingCandidate {
                depth: node.depth(),
            });
        };

        self.stats.on_branching();
        self.monitor.on_branch(&node, variable, self.stats);
        self.stack.push(node.child(variable, true, bound));
        self.stack.push(node.child(variable, false, bound));
        Ok(())
    }

    fn install(&mut self, candidate: Incumbent) {
        let sense = self.problem.sense();
        let improves = self
            .best
            .as_ref()
            .is_none_or(|best| sense.is_better(candidate.objective(), best.objective()));
        if !improves {
            return;
        }

        tracing::debug!(
            objective = candidate.objective(),
            ordinal = candidate.ordinal(),
            nodes = self.stats.nodes_explored,
            "new incumbent"
        );
        self.store.offer(&candidate);
        self.stats.on_solution_found();
        self.monitor.on_solution_found(&candidate, self.stats);
        self.best = Some(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::FirstFractionalBranching,
        monitor::{no_op::NoOperationMonitor, node_limit::NodeLimitMonitor},
        result::{SolverResult, TerminationReason},
    };
    use convene_lp::{error::LpError, relaxation::Relaxation, simplex::BoundedSimplex};
    use convene_model::{
        fixing::VariableFixings,
        formulate::{CoverageMode, formulate},
        index::{ConstraintIndex, SlotIndex},
        matrix::AttendanceMatrix,
        problem::{ConstraintKind, ProblemBuilder, Term, VariableKind},
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn triangle() -> AttendanceMatrix {
        AttendanceMatrix::from_binary_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]])
            .unwrap()
    }

    fn random_matrix(rng: &mut StdRng, slots: usize, entities: usize) -> AttendanceMatrix {
        let rows: Vec<Vec<i64>> = (0..slots)
            .map(|_| {
                (0..entities)
                    .map(|_| i64::from(rng.random_bool(0.35)))
                    .collect()
            })
            .collect();
        AttendanceMatrix::from_binary_rows(&rows).unwrap()
    }

    fn brute_force(problem: &Problem) -> Option<i64> {
        let n = problem.num_variables();
        let mut best: Option<i64> = None;
        for mask in 0u32..(1 << n) {
            let assignment: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
            if problem.first_violated(&assignment, 1e-9).is_some() {
                continue;
            }
            let objective = problem.objective_value(&assignment);
            if best.is_none_or(|b| problem.sense().is_better(objective, b)) {
                best = Some(objective);
            }
        }
        best
    }

    fn solve(problem: &Problem) -> BnbSolverOutcome {
        BnbSolver::new(BoundedSimplex::new())
            .solve(problem, NoOperationMonitor::new())
            .unwrap()
    }

    #[test]
    fn test_round_bound() {
        assert_eq!(round_bound(Sense::Minimize, 1.5, 1e-6), 2);
        assert_eq!(round_bound(Sense::Minimize, 2.0000001, 1e-6), 2);
        assert_eq!(round_bound(Sense::Maximize, 2.9999999, 1e-6), 3);
        assert_eq!(round_bound(Sense::Maximize, 2.5, 1e-6), 2);
    }

    #[test]
    fn test_triangle_minimum_cover() {
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let outcome = solve(&problem);

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
        let incumbent = outcome.result().incumbent().unwrap();
        assert_eq!(incumbent.objective(), 2);
        assert_eq!(problem.first_violated(incumbent.assignment(), 1e-9), None);

        let stats = outcome.statistics();
        assert_eq!(stats.root_bound, Some(2));
        assert!(stats.relaxations_solved >= 1);
        assert_eq!(stats.solutions_found as usize, 1);
    }

    #[test]
    fn test_triangle_budgeted_coverage() {
        let problem = formulate(&triangle(), CoverageMode::BudgetedCoverage { budget: 1 }).unwrap();
        let outcome = solve(&problem);
        match outcome.result() {
            SolverResult::Optimal(incumbent) => {
                assert_eq!(incumbent.objective(), 2);
                let slots = incumbent.assignment()[..3].iter().filter(|v| **v).count();
                assert_eq!(slots, 1);
            }
            other => panic!("expected Optimal, got {}", other),
        }
    }

    #[test]
    fn test_uncoverable_entity_is_proven_infeasible() {
        let matrix = AttendanceMatrix::from_binary_rows(&[vec![1, 0], vec![1, 0]]).unwrap();
        let problem = formulate(&matrix, CoverageMode::MinimumCover).unwrap();
        let outcome = solve(&problem);
        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert_eq!(outcome.statistics().prunings_infeasible, 1);
    }

    #[test]
    fn test_matches_brute_force_on_random_programs() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for round in 0..20 {
            let slots = rng.random_range(2..=7);
            let entities = rng.random_range(1..=5);
            let matrix = random_matrix(&mut rng, slots, entities);
            let budget = rng.random_range(0..=slots);

            for mode in [
                CoverageMode::MinimumCover,
                CoverageMode::BudgetedCoverage { budget },
            ] {
                let problem = formulate(&matrix, mode).unwrap();
                let expected = brute_force(&problem);
                let outcome = solve(&problem);
                let found = outcome.result().incumbent().map(Incumbent::objective);
                assert_eq!(found, expected, "round {round}, {mode}\n{matrix}");
                assert!(outcome.is_proven());
            }
        }
    }

    #[test]
    fn test_branching_rules_agree_on_objective() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            let matrix = random_matrix(&mut rng, 6, 5);
            let problem = formulate(&matrix, CoverageMode::BudgetedCoverage { budget: 2 }).unwrap();
            let a = solve(&problem);
            let b = BnbSolver::with_branching(BoundedSimplex::new(), FirstFractionalBranching)
                .solve(&problem, NoOperationMonitor::new())
                .unwrap();
            assert_eq!(
                a.result().incumbent().map(Incumbent::objective),
                b.result().incumbent().map(Incumbent::objective)
            );
        }
    }

    #[test]
    fn test_repeated_solves_are_identical() {
        let mut rng = StdRng::seed_from_u64(11);
        let matrix = random_matrix(&mut rng, 8, 6);
        let problem = formulate(&matrix, CoverageMode::BudgetedCoverage { budget: 3 }).unwrap();
        let first = solve(&problem);
        let second = solve(&problem);
        assert_eq!(first.result(), second.result());
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );
    }

    #[test]
    fn test_node_limit_aborts_with_unproven_result() {
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let outcome = BnbSolver::new(BoundedSimplex::new())
            .solve(&problem, NodeLimitMonitor::new(0))
            .unwrap();
        assert!(!outcome.is_proven());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_zero_budget_selects_nothing() {
        let matrix = AttendanceMatrix::from_binary_rows(&[vec![1, 0], vec![0, 1]]).unwrap();
        let problem = formulate(&matrix, CoverageMode::BudgetedCoverage { budget: 0 }).unwrap();
        let outcome = solve(&problem);
        let incumbent = outcome.result().incumbent().unwrap();
        assert_eq!(incumbent.objective(), 0);
        assert!(incumbent.assignment().iter().all(|v| !*v));
    }

    /// Fails on every node below the root.
    struct FaultyRelaxation;

    impl LinearRelaxation for FaultyRelaxation {
        fn name(&self) -> &str {
            "FaultyRelaxation"
        }

        fn solve(
            &self,
            problem: &Problem,
            fixings: &VariableFixings,
        ) -> Result<Relaxation, LpError> {
            if fixings.num_fixed() > 0 {
                return Err(LpError::IterationLimit { limit: 0 });
            }
            BoundedSimplex::new().solve(problem, fixings)
        }
    }

    #[test]
    fn test_relaxation_fault_is_an_error_not_a_prune() {
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let result = BnbSolver::new(FaultyRelaxation).solve(&problem, NoOperationMonitor::new());
        assert_eq!(
            result.unwrap_err(),
            BnbError::Relaxation {
                depth: 1,
                source: LpError::IterationLimit { limit: 0 },
            }
        );
    }

    /// Returns a damaged point once `damage_from` variables are fixed.
    struct DamagedRelaxation {
        damage_from: usize,
        objective: f64,
        values_len: Option<usize>,
    }

    impl LinearRelaxation for DamagedRelaxation {
        fn name(&self) -> &str {
            "DamagedRelaxation"
        }

        fn solve(
            &self,
            problem: &Problem,
            fixings: &VariableFixings,
        ) -> Result<Relaxation, LpError> {
            let honest = BoundedSimplex::new().solve(problem, fixings)?;
            if fixings.num_fixed() < self.damage_from {
                return Ok(honest);
            }
            let mut values = honest.values().to_vec();
            if let Some(len) = self.values_len {
                values.resize(len, 0.0);
            }
            Ok(Relaxation::optimal(self.objective, values, 0))
        }
    }

    #[test]
    fn test_nan_objective_fails_the_solve() {
        // The minimize root is fractional, so the damage hits its children.
        let below_root = DamagedRelaxation {
            damage_from: 1,
            objective: f64::NAN,
            values_len: None,
        };
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let result = BnbSolver::new(below_root).solve(&problem, NoOperationMonitor::new());
        assert_eq!(
            result.unwrap_err(),
            BnbError::Relaxation {
                depth: 1,
                source: LpError::NonFiniteObjective,
            }
        );

        // A NaN maximize bound must not become 0 and prune everything.
        let at_root = DamagedRelaxation {
            damage_from: 0,
            objective: f64::NAN,
            values_len: None,
        };
        let problem = formulate(&triangle(), CoverageMode::BudgetedCoverage { budget: 1 }).unwrap();
        let result = BnbSolver::new(at_root).solve(&problem, NoOperationMonitor::new());
        assert_eq!(
            result.unwrap_err(),
            BnbError::Relaxation {
                depth: 0,
                source: LpError::NonFiniteObjective,
            }
        );
    }

    #[test]
    fn test_infinite_objective_fails_the_solve() {
        let damaged = DamagedRelaxation {
            damage_from: 1,
            objective: f64::INFINITY,
            values_len: None,
        };
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let result = BnbSolver::new(damaged).solve(&problem, NoOperationMonitor::new());
        assert!(matches!(
            result,
            Err(BnbError::Relaxation {
                source: LpError::NonFiniteObjective,
                ..
            })
        ));
    }

    #[test]
    fn test_short_value_vector_fails_the_solve() {
        let damaged = DamagedRelaxation {
            damage_from: 1,
            objective: 2.0,
            values_len: Some(1),
        };
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let result = BnbSolver::new(damaged).solve(&problem, NoOperationMonitor::new());
        assert_eq!(
            result.unwrap_err(),
            BnbError::RelaxationDimensionMismatch {
                depth: 1,
                expected: 3,
                found: 1,
            }
        );
    }

    #[test]
    fn test_checked_objective_rejects_nan_values() {
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let relaxation = Relaxation::optimal(1.5, vec![0.5, f64::NAN, 0.5], 0);
        assert_eq!(
            checked_objective(&problem, &relaxation, 4),
            Err(BnbError::NonFiniteRelaxationValue {
                depth: 4,
                variable: VariableIndex::new(1),
            })
        );

        let healthy = Relaxation::optimal(1.5, vec![0.5; 3], 0);
        assert_eq!(checked_objective(&problem, &healthy, 0), Ok(1.5));
    }


    struct LyingRelaxation;

    impl LinearRelaxation for LyingRelaxation {
        fn name(&self) -> &str {
            "LyingRelaxation"
        }

        fn solve(
            &self,
            problem: &Problem,
            _fixings: &VariableFixings,
        ) -> Result<Relaxation, LpError> {
            Ok(Relaxation::optimal(0.0, vec![0.0; problem.num_variables()], 0))
        }
    }

    #[test]
    fn test_invalid_integral_point_is_an_error() {
        let problem = formulate(&triangle(), CoverageMode::MinimumCover).unwrap();
        let result = BnbSolver::new(LyingRelaxation).solve(&problem, NoOperationMonitor::new());
        assert_eq!(
            result.unwrap_err(),
            BnbError::InvalidIncumbent {
                constraint: ConstraintIndex::new(0)
            }
        );
    }

    #[test]
    fn test_generic_program_with_fractional_auxiliary() {
        // max y, y <= 0.5 x0 + 0.5 x1, x0 + x1 = 1. The relaxation can put
        // y at 0.5 with integral slots, so the engine must branch on y.
        let mut builder = ProblemBuilder::new(Sense::Maximize);
        let x0 = builder.add_variable(VariableKind::Slot(SlotIndex::new(0)), 0);
        let x1 = builder.add_variable(VariableKind::Slot(SlotIndex::new(1)), 0);
        let y = builder.add_variable(
            VariableKind::Entity(convene_model::index::EntityIndex::new(0)),
            1,
        );
        builder.add_constraint(
            [Term::new(x0, 0.5), Term::new(x1, 0.5), Term::new(y, -1.0)],
            ConstraintKind::GreaterEqual,
            0.0,
        );
        builder.add_constraint(
            [Term::new(x0, 1.0), Term::new(x1, 1.0)],
            ConstraintKind::Equal,
            1.0,
        );
        let problem = builder.build().unwrap();
        let outcome = solve(&problem);
        let incumbent = outcome.result().incumbent().unwrap();
        assert_eq!(incumbent.objective(), 0);
        assert!(outcome.is_proven());
    }
}
