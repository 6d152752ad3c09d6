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

//! # Convene Model
//!
//! Domain model and 0/1 integer-program abstraction for exact meeting-slot
//! selection.
//!
//! ## Modules
//!
//! * **`index`**: strongly typed indices (`SlotIndex`, `EntityIndex`,
//!   `VariableIndex`, `ConstraintIndex`).
//! * **`matrix`**: the validated, immutable `AttendanceMatrix` (slots x entities).
//! * **`problem`**: `Problem`, its `ProblemBuilder`, constraints and sense.
//! * **`fixing`**: `VariableFixings`, the per-node bound overrides used by
//!   branch-and-bound.
//! * **`formulate`**: turns a matrix and a `CoverageMode` into a `Problem`.
//! * **`error`**: `ModelError`, raised for malformed input before any solving.
//!
//! Input is validated eagerly: once an `AttendanceMatrix` or `Problem` exists,
//! downstream solvers never see ragged rows or dangling variable references.

pub mod error;
pub mod fixing;
pub mod formulate;
pub mod index;
pub mod matrix;
pub mod problem;
