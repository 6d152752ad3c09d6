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

use convene_model::{
    error::ModelError,
    index::{ConstraintIndex, VariableIndex},
};

/// Internal faults of a relaxation solver.
///
/// None of these says anything about the feasibility of the program. A
/// caller must not treat them as an infeasible node: they mean the bound
/// could not be computed reliably.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LpError {
    /// The simplex did not reach an optimal basis within its pivot budget.
    #[error("simplex exceeded its iteration limit of {limit}")]
    IterationLimit { limit: usize },
    /// The relaxed point reported as optimal fails a constraint.
    #[error("relaxed point violates {constraint} by {violation:e}")]
    NumericalInstability {
        constraint: ConstraintIndex,
        violation: f64,
    },
    /// A relaxed value left the unit interval.
    #[error("relaxed value {value} of {variable} lies outside [0, 1]")]
    BoundViolation { variable: VariableIndex, value: f64 },
    /// The relaxation produced a non-finite objective value.
    #[error("relaxation produced a non-finite objective")]
    NonFiniteObjective,
    /// The fixings do not match the program.
    #[error(transparent)]
    Model(#[from] ModelError),
}
