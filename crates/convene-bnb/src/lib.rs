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

//! Exact branch-and-bound for 0/1 integer programs.
//!
//! The engine pairs a `LinearRelaxation` for node bounds with a
//! `BranchingRule` for splitting, explores the tree depth-first, and reports
//! a `BnbSolverOutcome` with the incumbent, the termination reason and
//! search statistics. `TreeSearchMonitor`s observe the search and may stop
//! it. `BnbSolver::solve_parallel` spreads subtrees over worker threads and
//! returns the same incumbent as the sequential search.

pub mod bnb;
pub mod branching;
pub mod cardinality;
pub mod error;
pub mod incumbent;
pub mod monitor;
pub mod node;
pub mod parallel;
pub mod result;
pub mod stack;
pub mod stats;
