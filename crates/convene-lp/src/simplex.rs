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

//! Bounded-variable two-phase primal simplex.
//!
//! Fixed variables are substituted into the right-hand sides and every free
//! variable is kept in `[0, 1]` through bound flips instead of explicit
//! rows. Each row is normalised to a non-negative right-hand side; a row
//! whose slack enters with `+1` starts with the slack basic, all others get
//! an artificial column. Phase one minimises the sum of artificials, phase
//! two the program objective (negated for maximisation). Artificials are
//! pinned to zero and barred from entering once phase one ends.
//!
//! Entering columns are priced by largest reduced cost until a run of
//! degenerate pivots is seen, after which the solve switches to Bland's
//! smallest-index rule for the rest of the solve.

use crate::{
    error::LpError,
    options::SimplexOptions,
    relaxation::{LinearRelaxation, Relaxation},
    tableau::Tableau,
};
use convene_model::{
    fixing::VariableFixings,
    index::{ConstraintIndex, VariableIndex},
    problem::{ConstraintKind, Problem, Sense},
};

/// Ties in the ratio test closer than this are broken by the pivot rule.
const RATIO_TIE: f64 = 1e-12;

/// Solves node relaxations with a dense bounded-variable simplex.
///
/// The solver holds no state between calls; every `solve` builds its own
/// tableau, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct BoundedSimplex {
    options: SimplexOptions,
}

impl BoundedSimplex {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_options(options: SimplexOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &SimplexOptions {
        &self.options
    }
}

impl LinearRelaxation for BoundedSimplex {
    fn name(&self) -> &str {
        "BoundedSimplex"
    }

    fn solve(&self, problem: &Problem, fixings: &VariableFixings) -> Result<Relaxation, LpError> {
        fixings.check_dimensions(problem)?;

        let form = match StandardForm::build(problem, fixings, &self.options) {
            Some(form) => form,
            None => {
                tracing::trace!("fixings violate a fully fixed constraint");
                return Ok(Relaxation::infeasible(0));
            }
        };

        let mut session = SimplexSession::new(&form, &self.options);
        if session.num_artificials > 0 {
            session.load_phase_one_costs();
            session.optimize()?;
            let infeasibility = session.artificial_infeasibility();
            if infeasibility > self.options.feasibility_tolerance {
                tracing::trace!(
                    infeasibility,
                    iterations = session.iterations,
                    "phase one proved the relaxation infeasible"
                );
                return Ok(Relaxation::infeasible(session.iterations));
            }
            session.retire_artificials();
        }

        session.load_phase_two_costs(&form);
        if let PhaseOutcome::Unbounded = session.optimize()? {
            return Ok(Relaxation::unbounded(session.iterations));
        }

        let structural = session.structural_values();
        check_bounds(&form, &structural, &self.options)?;
        let values = form.expand(problem, fixings, &structural);
        let objective: f64 = problem
            .objective()
            .iter()
            .zip(&values)
            .map(|(&c, &v)| c as f64 * v)
            .sum();
        if !objective.is_finite() {
            return Err(LpError::NonFiniteObjective);
        }
        check_residuals(problem, &values, &self.options)?;

        tracing::trace!(
            objective,
            iterations = session.iterations,
            rows = session.tableau.rows(),
            columns = session.tableau.columns(),
            "relaxation solved"
        );
        Ok(Relaxation::optimal(objective, values, session.iterations))
    }
}

/// Verifies the relaxed point against the original constraints.
fn check_residuals(
    problem: &Problem,
    values: &[f64],
    options: &SimplexOptions,
) -> Result<(), LpError> {
    for (index, constraint) in problem.constraints().iter().enumerate() {
        let mut activity = 0.0;
        let mut magnitude = 1.0;
        for term in constraint.terms() {
            activity += term.coefficient * values[term.variable.get()];
            magnitude += term.coefficient.abs();
        }
        let tolerance = options.feasibility_tolerance * magnitude;
        if !constraint.is_satisfied_by(activity, tolerance) {
            return Err(LpError::NumericalInstability {
                constraint: ConstraintIndex::new(index),
                violation: (activity - constraint.rhs()).abs(),
            });
        }
    }
    Ok(())
}

/// Verifies that the structural values stayed inside the unit box.
fn check_bounds(
    form: &StandardForm,
    structural: &[f64],
    options: &SimplexOptions,
) -> Result<(), LpError> {
    let tolerance = options.feasibility_tolerance;
    for (&variable, &value) in form.columns.iter().zip(structural) {
        if !(-tolerance..=1.0 + tolerance).contains(&value) {
            return Err(LpError::BoundViolation { variable, value });
        }
    }
    Ok(())
}

/// A constraint row after substitution and sign normalisation.
#[derive(Debug, Clone)]
struct StandardRow {
    /// `(structural column, coefficient)` pairs.
    terms: Vec<(usize, f64)>,
    /// Coefficient of the slack column, `None` for equalities.
    slack: Option<f64>,
    rhs: f64,
}

impl StandardRow {
    #[inline]
    fn needs_artificial(&self) -> bool {
        self.slack != Some(1.0)
    }
}

/// The relaxation restricted to the free variables.
#[derive(Debug, Clone)]
struct StandardForm {
    /// Original variable of each structural column.
    columns: Vec<VariableIndex>,
    /// Minimisation cost of each structural column.
    costs: Vec<f64>,
    rows: Vec<StandardRow>,
}

impl StandardForm {
    /// Substitutes the fixings into `problem`.
    ///
    /// Returns `None` when a constraint without free terms is violated by
    /// its fixed part alone.
    fn build(
        problem: &Problem,
        fixings: &VariableFixings,
        options: &SimplexOptions,
    ) -> Option<Self> {
        let sign = match problem.sense() {
            Sense::Minimize => 1.0,
            Sense::Maximize => -1.0,
        };

        let mut column_of = vec![usize::MAX; problem.num_variables()];
        let mut columns = Vec::with_capacity(problem.num_variables() - fixings.num_fixed());
        let mut costs = Vec::with_capacity(columns.capacity());
        for variable in problem.variables() {
            let index = variable.index();
            if !fixings.is_fixed(index) {
                column_of[index.get()] = columns.len();
                columns.push(index);
                costs.push(sign * problem.objective()[index.get()] as f64);
            }
        }

        let mut rows = Vec::with_capacity(problem.num_constraints());
        for constraint in problem.constraints() {
            let mut rhs = constraint.rhs();
            let mut terms = Vec::with_capacity(constraint.terms().len());
            for term in constraint.terms() {
                match fixings.value(term.variable) {
                    Some(true) => rhs -= term.coefficient,
                    Some(false) => {}
                    None if term.coefficient != 0.0 => {
                        terms.push((column_of[term.variable.get()], term.coefficient))
                    }
                    None => {}
                }
            }

            if terms.is_empty() {
                let satisfied = match constraint.kind() {
                    ConstraintKind::GreaterEqual => 0.0 >= rhs - options.feasibility_tolerance,
                    ConstraintKind::LessEqual => 0.0 <= rhs + options.feasibility_tolerance,
                    ConstraintKind::Equal => rhs.abs() <= options.feasibility_tolerance,
                };
                if !satisfied {
                    return None;
                }
                continue;
            }

            let mut slack = match constraint.kind() {
                ConstraintKind::GreaterEqual => Some(-1.0),
                ConstraintKind::LessEqual => Some(1.0),
                ConstraintKind::Equal => None,
            };
            if rhs < 0.0 {
                rhs = -rhs;
                for (_, coefficient) in terms.iter_mut() {
                    *coefficient = -*coefficient;
                }
                slack = slack.map(|s: f64| -s);
            }
            rows.push(StandardRow { terms, slack, rhs });
        }

        Some(Self {
            columns,
            costs,
            rows,
        })
    }

    /// Maps structural values back onto the full variable vector.
    fn expand(&self, problem: &Problem, fixings: &VariableFixings, structural: &[f64]) -> Vec<f64> {
        let mut values = vec![0.0; problem.num_variables()];
        for (variable, value) in fixings.iter_fixed() {
            values[variable.get()] = if value { 1.0 } else { 0.0 };
        }
        for (variable, &value) in self.columns.iter().zip(structural) {
            values[variable.get()] = value.clamp(0.0, 1.0);
        }
        values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseOutcome {
    Optimal,
    Unbounded,
}

/// One simplex iteration's decision after pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// The entering column moves to its opposite bound without a pivot.
    Flip { step: f64 },
    /// The basic variable of `row` leaves at its lower or upper bound.
    Pivot { row: usize, step: f64, to_upper: bool },
    Unbounded,
}

/// Working state of a single relaxation solve.
///
/// Columns are laid out as structural, then slack, then artificial.
struct SimplexSession<'a> {
    options: &'a SimplexOptions,
    tableau: Tableau,
    basis: Vec<usize>,
    /// Value of the basic variable of each row.
    beta: Vec<f64>,
    upper: Vec<f64>,
    at_upper: Vec<bool>,
    is_basic: Vec<bool>,
    /// Columns that may never enter the basis again.
    barred: Vec<bool>,
    cost: Vec<f64>,
    reduced: Vec<f64>,
    num_structural: usize,
    first_artificial: usize,
    num_artificials: usize,
    iterations: usize,
    iteration_limit: usize,
    bland: bool,
    degenerate_streak: usize,
}

impl<'a> SimplexSession<'a> {
    fn new(form: &StandardForm, options: &'a SimplexOptions) -> Self {
        let num_structural = form.columns.len();
        let num_slacks = form.rows.iter().filter(|r| r.slack.is_some()).count();
        let num_artificials = form.rows.iter().filter(|r| r.needs_artificial()).count();
        let first_slack = num_structural;
        let first_artificial = first_slack + num_slacks;
        let num_columns = first_artificial + num_artificials;
        let num_rows = form.rows.len();

        let mut tableau = Tableau::zeros(num_rows, num_columns);
        let mut basis = Vec::with_capacity(num_rows);
        let mut beta = Vec::with_capacity(num_rows);
        let mut is_basic = vec![false; num_columns];
        let mut upper = vec![f64::INFINITY; num_columns];
        upper[..num_structural].fill(1.0);

        let mut next_slack = first_slack;
        let mut next_artificial = first_artificial;
        for (i, row) in form.rows.iter().enumerate() {
            for &(column, coefficient) in &row.terms {
                tableau.set(i, column, coefficient);
            }
            if let Some(coefficient) = row.slack {
                tableau.set(i, next_slack, coefficient);
                if !row.needs_artificial() {
                    basis.push(next_slack);
                }
                next_slack += 1;
            }
            if row.needs_artificial() {
                tableau.set(i, next_artificial, 1.0);
                basis.push(next_artificial);
                next_artificial += 1;
            }
            is_basic[basis[i]] = true;
            beta.push(row.rhs);
        }

        let iteration_limit = options.iteration_limit(num_rows, num_columns);
        Self {
            options,
            tableau,
            basis,
            beta,
            upper,
            at_upper: vec![false; num_columns],
            is_basic,
            barred: vec![false; num_columns],
            cost: vec![0.0; num_columns],
            reduced: vec![0.0; num_columns],
            num_structural,
            first_artificial,
            num_artificials,
            iterations: 0,
            iteration_limit,
            bland: false,
            degenerate_streak: 0,
        }
    }

    #[inline]
    fn is_artificial(&self, column: usize) -> bool {
        column >= self.first_artificial
    }

    #[inline]
    fn nonbasic_value(&self, column: usize) -> f64 {
        if self.at_upper[column] {
            self.upper[column]
        } else {
            0.0
        }
    }

    fn load_phase_one_costs(&mut self) {
        self.cost.fill(0.0);
        self.cost[self.first_artificial..].fill(1.0);
        self.refresh_reduced_costs();
    }

    fn load_phase_two_costs(&mut self, form: &StandardForm) {
        self.cost.fill(0.0);
        self.cost[..self.num_structural].copy_from_slice(&form.costs);
        self.refresh_reduced_costs();
    }

    /// Recomputes `d_j = c_j - c_B^T t_j` from scratch.
    fn refresh_reduced_costs(&mut self) {
        self.reduced.copy_from_slice(&self.cost);
        for (i, &b) in self.basis.iter().enumerate() {
            let cb = self.cost[b];
            if cb == 0.0 {
                continue;
            }
            for (d, &t) in self.reduced.iter_mut().zip(self.tableau.row(i)) {
                *d -= cb * t;
            }
        }
        for (d, &basic) in self.reduced.iter_mut().zip(&self.is_basic) {
            if basic {
                *d = 0.0;
            }
        }
    }

    /// Sum of the basic artificials; nonbasic artificials sit at zero.
    fn artificial_infeasibility(&self) -> f64 {
        self.basis
            .iter()
            .zip(&self.beta)
            .filter(|(b, _)| self.is_artificial(**b))
            .map(|(_, v)| v.max(0.0))
            .sum()
    }

    /// Pins every artificial to zero and pivots basic ones out where a
    /// non-artificial column can replace them.
    fn retire_artificials(&mut self) {
        for column in self.first_artificial..self.upper.len() {
            self.upper[column] = 0.0;
            self.barred[column] = true;
            self.at_upper[column] = false;
        }

        for row in 0..self.basis.len() {
            if !self.is_artificial(self.basis[row]) {
                continue;
            }
            let replacement = (0..self.first_artificial)
                .filter(|&j| !self.is_basic[j])
                .map(|j| (j, self.tableau.at(row, j).abs()))
                .filter(|&(_, magnitude)| magnitude > self.options.pivot_tolerance.max(1e-7))
                .max_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((column, _)) = replacement {
                // Degenerate pivot: the artificial is zero, so no value moves.
                let value = self.nonbasic_value(column);
                self.apply_pivot(row, column, value, false);
            } else {
                // Redundant row; the artificial stays basic at zero.
                self.beta[row] = 0.0;
            }
        }
    }

    /// Runs primal simplex iterations on the current costs.
    fn optimize(&mut self) -> Result<PhaseOutcome, LpError> {
        loop {
            let Some(entering) = self.select_entering() else {
                return Ok(PhaseOutcome::Optimal);
            };
            if self.iterations >= self.iteration_limit {
                return Err(LpError::IterationLimit {
                    limit: self.iteration_limit,
                });
            }
            self.iterations += 1;

            let direction = if self.at_upper[entering] { -1.0 } else { 1.0 };
            let step = self.ratio_test(entering, direction);
            let length = match step {
                Step::Unbounded => return Ok(PhaseOutcome::Unbounded),
                Step::Flip { step } => {
                    self.move_basics(entering, direction, step, None);
                    self.at_upper[entering] = !self.at_upper[entering];
                    step
                }
                Step::Pivot {
                    row,
                    step,
                    to_upper,
                } => {
                    self.move_basics(entering, direction, step, Some(row));
                    let value = self.nonbasic_value(entering) + direction * step;
                    self.apply_pivot(row, entering, value, to_upper);
                    step
                }
            };

            if length <= self.options.pivot_tolerance {
                self.degenerate_streak += 1;
                if !self.bland && self.degenerate_streak >= self.options.degenerate_pivot_threshold
                {
                    tracing::trace!(
                        iterations = self.iterations,
                        "switching to Bland's rule after degenerate pivots"
                    );
                    self.bland = true;
                }
            } else {
                self.degenerate_streak = 0;
            }
        }
    }

    /// Picks an improving nonbasic column, or `None` at optimality.
    fn select_entering(&self) -> Option<usize> {
        let tolerance = self.options.optimality_tolerance;
        let mut best: Option<(usize, f64)> = None;
        for j in 0..self.reduced.len() {
            if self.is_basic[j] || self.barred[j] {
                continue;
            }
            let d = self.reduced[j];
            let improvement = if self.at_upper[j] { d } else { -d };
            if improvement <= tolerance {
                continue;
            }
            // A column already at both bounds cannot move.
            if self.upper[j] <= 0.0 {
                continue;
            }
            if self.bland {
                return Some(j);
            }
            if best.is_none_or(|(_, b)| improvement > b) {
                best = Some((j, improvement));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Bounded ratio test including the entering column's own bound flip.
    fn ratio_test(&self, entering: usize, direction: f64) -> Step {
        let tolerance = self.options.pivot_tolerance;
        let mut best: Option<(usize, f64, bool, f64)> = None;

        for (i, &b) in self.basis.iter().enumerate() {
            let alpha = self.tableau.at(i, entering) * direction;
            let (step, to_upper) = if alpha > tolerance {
                ((self.beta[i] / alpha).max(0.0), false)
            } else if alpha < -tolerance && self.upper[b].is_finite() {
                (((self.upper[b] - self.beta[i]) / -alpha).max(0.0), true)
            } else {
                continue;
            };

            let replace = match best {
                None => true,
                Some((row, best_step, _, best_alpha)) => {
                    if step < best_step - RATIO_TIE {
                        true
                    } else if step <= best_step + RATIO_TIE {
                        if self.bland {
                            b < self.basis[row]
                        } else {
                            alpha.abs() > best_alpha
                        }
                    } else {
                        false
                    }
                }
            };
            if replace {
                best = Some((i, step, to_upper, alpha.abs()));
            }
        }

        let flip = self.upper[entering];
        match best {
            Some((row, step, to_upper, _)) if step < flip => Step::Pivot {
                row,
                step,
                to_upper,
            },
            _ if flip.is_finite() => Step::Flip { step: flip },
            _ => Step::Unbounded,
        }
    }

    /// Moves the basic variables as the entering column travels `step`.
    fn move_basics(&mut self, entering: usize, direction: f64, step: f64, skip: Option<usize>) {
        if step == 0.0 {
            return;
        }
        for i in 0..self.beta.len() {
            if Some(i) != skip {
                self.beta[i] -= self.tableau.at(i, entering) * direction * step;
            }
        }
    }

    /// Exchanges the basic variable of `row` for `entering`, which takes
    /// the value `value`.
    fn apply_pivot(&mut self, row: usize, entering: usize, value: f64, to_upper: bool) {
        let leaving = self.basis[row];
        self.is_basic[leaving] = false;
        self.at_upper[leaving] = to_upper;
        self.is_basic[entering] = true;
        self.at_upper[entering] = false;
        self.beta[row] = value;
        self.basis[row] = entering;

        self.tableau.pivot(row, entering);
        let dq = self.reduced[entering];
        if dq != 0.0 {
            for (d, &t) in self.reduced.iter_mut().zip(self.tableau.row(row)) {
                *d -= dq * t;
            }
        }
        self.reduced[entering] = 0.0;
    }

    /// Current values of the structural columns.
    fn structural_values(&self) -> Vec<f64> {
        let mut values: Vec<f64> = (0..self.num_structural)
            .map(|j| self.nonbasic_value(j))
            .collect();
        for (&b, &v) in self.basis.iter().zip(&self.beta) {
            if b < self.num_structural {
                values[b] = v;
            }
        }
        values
    }
}
