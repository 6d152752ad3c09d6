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

//! Branching decisions as bound overrides.
//!
//! A `VariableFixings` records which variables of a `Problem` have been fixed
//! to `0` or `1` along a path of the search tree. Free variables keep their
//! relaxed domain `[0, 1]`. Two bitsets of the problem's width hold the
//! state: `fixed` marks fixed variables, `ones` their value.
//!
//! Invariant: `ones` is a subset of `fixed`.

use crate::{error::ModelError, index::VariableIndex, problem::Problem};
use fixedbitset::FixedBitSet;

/// Per-variable fixed/free state for one search node.
#[derive(Clone, PartialEq, Eq)]
pub struct VariableFixings {
    fixed: FixedBitSet,
    ones: FixedBitSet,
}

impl VariableFixings {
    /// All `num_variables` variables free.
    #[inline]
    pub fn new(num_variables: usize) -> Self {
        Self {
            fixed: FixedBitSet::with_capacity(num_variables),
            ones: FixedBitSet::with_capacity(num_variables),
        }
    }

    /// All variables of `problem` free.
    #[inline]
    pub fn for_problem(problem: &Problem) -> Self {
        Self::new(problem.num_variables())
    }

    /// Checks that these fixings were sized for `problem`.
    ///
    /// # Errors
    ///
    /// `ModelError::FixingDimensionMismatch` on a width mismatch.
    #[inline]
    pub fn check_dimensions(&self, problem: &Problem) -> Result<(), ModelError> {
        if self.len() != problem.num_variables() {
            return Err(ModelError::FixingDimensionMismatch {
                expected: problem.num_variables(),
                found: self.len(),
            });
        }
        Ok(())
    }

    /// Number of variables covered, fixed or free.
    #[inline]
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Fixes `variable` to `value`, overriding an earlier fixing.
    ///
    /// # Panics
    ///
    /// Panics if `variable` is out of bounds.
    #[inline]
    pub fn fix(&mut self, variable: VariableIndex, value: bool) {
        self.fixed.insert(variable.get());
        self.ones.set(variable.get(), value);
    }

    /// Returns a copy with `variable` additionally fixed to `value`.
    #[inline]
    pub fn with_fixed(&self, variable: VariableIndex, value: bool) -> Self {
        let mut child = self.clone();
        child.fix(variable, value);
        child
    }

    /// Returns the fixed value of `variable`, or `None` if it is free.
    #[inline]
    pub fn value(&self, variable: VariableIndex) -> Option<bool> {
        let i = variable.get();
        if self.fixed.contains(i) {
            Some(self.ones.contains(i))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_fixed(&self, variable: VariableIndex) -> bool {
        self.fixed.contains(variable.get())
    }

    /// Number of fixed variables.
    #[inline]
    pub fn num_fixed(&self) -> usize {
        self.fixed.count_ones(..)
    }

    /// Number of variables fixed to `1`.
    #[inline]
    pub fn num_fixed_to_one(&self) -> usize {
        self.ones.count_ones(..)
    }

    /// Iterates over fixed variables and their values in ascending order.
    pub fn iter_fixed(&self) -> impl Iterator<Item = (VariableIndex, bool)> + '_ {
        self.fixed
            .ones()
            .map(|i| (VariableIndex::new(i), self.ones.contains(i)))
    }
}

impl std::fmt::Debug for VariableFixings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter_fixed().map(|(v, value)| (v.get(), value as u8)))
            .finish()
    }
}
