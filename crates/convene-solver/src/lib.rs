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

//! # Convene Solver
//!
//! Exact meeting-slot selection over an attendance matrix.
//!
//! ## Modules
//!
//! - `solver`: `Solver` and `SolverBuilder`, plus the `minimize_meetings`
//!   and `maximize_attendance` entry points.
//! - `selection`: `Selection`, the ordered slot indices of a solve with its
//!   objective, termination reason and statistics, and `extract`.
//! - `error`: `SolveError`, separating rejected input from internal faults.
//!
//! A proven-infeasible minimum cover is an empty selection, not an error.

pub mod error;
pub mod selection;
pub mod solver;

pub use error::SolveError;
pub use selection::Selection;
pub use solver::{Solver, SolverBuilder, maximize_attendance, minimize_meetings};
