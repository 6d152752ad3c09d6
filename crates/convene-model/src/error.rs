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

use crate::index::{ConstraintIndex, VariableIndex};

/// Errors raised while validating input or assembling a `Problem`.
///
/// All of these are reported before any search starts; none of them is
/// retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The attendance matrix has no slot rows.
    #[error("attendance matrix has no slots")]
    EmptyMatrix,
    /// The attendance matrix rows have no entity columns.
    #[error("attendance matrix has no entities")]
    NoEntities,
    /// A row has a different number of columns than the first row.
    #[error("slot row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell of an integer grid is neither `0` nor `1`.
    #[error("cell ({row}, {column}) holds {value}, expected 0 or 1")]
    NonBinaryCell { row: usize, column: usize, value: i64 },
    /// The slot budget is larger than the number of slots.
    #[error("budget {budget} is outside [0, {num_slots}]")]
    BudgetOutOfRange { budget: usize, num_slots: usize },
    /// A constraint term names a variable that was never declared.
    #[error("{constraint} references undeclared {variable} (problem has {num_variables} variables)")]
    UnknownVariable {
        constraint: ConstraintIndex,
        variable: VariableIndex,
        num_variables: usize,
    },
    /// The same variable appears twice in one constraint.
    #[error("{constraint} lists {variable} more than once")]
    DuplicateTerm {
        constraint: ConstraintIndex,
        variable: VariableIndex,
    },
    /// A coefficient or right-hand side is NaN or infinite.
    #[error("{constraint} has a non-finite coefficient or right-hand side")]
    NonFiniteCoefficient { constraint: ConstraintIndex },
    /// A fixing set was sized for a different problem.
    #[error("fixings cover {found} variables, problem has {expected}")]
    FixingDimensionMismatch { expected: usize, found: usize },
}
