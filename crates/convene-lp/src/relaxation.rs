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

use crate::error::LpError;
use convene_model::{fixing::VariableFixings, problem::Problem};

/// How a relaxation solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelaxationStatus {
    /// An optimal relaxed point was found.
    Optimal,
    /// No relaxed point satisfies the constraints and fixings.
    Infeasible,
    /// The relaxed objective is unbounded in the improving direction.
    Unbounded,
}

impl std::fmt::Display for RelaxationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelaxationStatus::Optimal => write!(f, "Optimal"),
            RelaxationStatus::Infeasible => write!(f, "Infeasible"),
            RelaxationStatus::Unbounded => write!(f, "Unbounded"),
        }
    }
}

/// The result of solving the continuous relaxation of a node.
///
/// `values` has one entry per program variable, fixed variables included,
/// and is empty unless the status is `Optimal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    status: RelaxationStatus,
    objective: f64,
    values: Vec<f64>,
    iterations: usize,
}

impl Relaxation {
    #[inline]
    pub fn optimal(objective: f64, values: Vec<f64>, iterations: usize) -> Self {
        Self {
            status: RelaxationStatus::Optimal,
            objective,
            values,
            iterations,
        }
    }

    #[inline]
    pub fn infeasible(iterations: usize) -> Self {
        Self {
            status: RelaxationStatus::Infeasible,
            objective: f64::NAN,
            values: Vec::new(),
            iterations,
        }
    }

    #[inline]
    pub fn unbounded(iterations: usize) -> Self {
        Self {
            status: RelaxationStatus::Unbounded,
            objective: f64::NAN,
            values: Vec::new(),
            iterations,
        }
    }

    #[inline]
    pub fn status(&self) -> RelaxationStatus {
        self.status
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.status == RelaxationStatus::Optimal
    }

    /// Objective value in the program's own sense, if optimal.
    #[inline]
    pub fn objective(&self) -> Option<f64> {
        self.is_optimal().then_some(self.objective)
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Simplex pivots and bound flips spent on this solve.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Distance of `value` from the nearest integer.
    #[inline]
    pub fn fractionality(value: f64) -> f64 {
        (value - value.round()).abs()
    }

    /// Returns `true` if every value lies within `tolerance` of 0 or 1.
    pub fn is_integral(&self, tolerance: f64) -> bool {
        self.is_optimal()
            && self
                .values
                .iter()
                .all(|&v| Self::fractionality(v) <= tolerance)
    }

    /// Rounds the values to a 0/1 assignment.
    pub fn rounded(&self) -> Vec<bool> {
        self.values.iter().map(|&v| v >= 0.5).collect()
    }
}

/// Computes bounds for a node of the search tree.
///
/// Implementations solve the continuous relaxation of `problem` with the
/// fixed variables substituted out and every free variable in `[0, 1]`.
pub trait LinearRelaxation {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Solves the relaxation under `fixings`.
    ///
    /// `Ok` with status `Infeasible` is a proof that no completion of the
    /// fixings is feasible. `Err` is an internal fault and proves nothing.
    fn solve(&self, problem: &Problem, fixings: &VariableFixings) -> Result<Relaxation, LpError>;
}

impl<R> LinearRelaxation for &R
where
    R: LinearRelaxation + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn solve(&self, problem: &Problem, fixings: &VariableFixings) -> Result<Relaxation, LpError> {
        (**self).solve(problem, fixings)
    }
}
