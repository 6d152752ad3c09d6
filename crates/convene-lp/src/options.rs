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

/// Default tolerance for feasibility and integrality decisions.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Numeric tolerances and limits of `BoundedSimplex`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplexOptions {
    /// Largest constraint or phase-one residual still counted as feasible.
    pub feasibility_tolerance: f64,
    /// Smallest reduced cost that still counts as improving.
    pub optimality_tolerance: f64,
    /// Smallest tableau entry accepted as a pivot.
    pub pivot_tolerance: f64,
    /// Largest distance from 0 or 1 still treated as integral.
    pub integrality_tolerance: f64,
    /// Pivot budget per solve, multiplied by `rows + columns`.
    pub iteration_limit_factor: usize,
    /// Consecutive degenerate pivots before switching to Bland's rule.
    pub degenerate_pivot_threshold: usize,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            feasibility_tolerance: DEFAULT_EPSILON,
            optimality_tolerance: 1e-9,
            pivot_tolerance: 1e-9,
            integrality_tolerance: DEFAULT_EPSILON,
            iteration_limit_factor: 50,
            degenerate_pivot_threshold: 64,
        }
    }
}

impl SimplexOptions {
    #[inline]
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_degenerate_pivot_threshold(mut self, threshold: usize) -> Self {
        self.degenerate_pivot_threshold = threshold;
        self
    }

    #[inline]
    pub fn with_iteration_limit_factor(mut self, factor: usize) -> Self {
        self.iteration_limit_factor = factor;
        self
    }

    /// Pivot budget for a tableau of the given shape.
    #[inline]
    pub fn iteration_limit(&self, rows: usize, columns: usize) -> usize {
        self.iteration_limit_factor.saturating_mul(rows + columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let options = SimplexOptions::default();
        assert_eq!(options.feasibility_tolerance, DEFAULT_EPSILON);
        assert_eq!(options.iteration_limit(2, 3), 250);

        let options = options
            .with_feasibility_tolerance(1e-7)
            .with_iteration_limit_factor(0);
        assert_eq!(options.feasibility_tolerance, 1e-7);
        assert_eq!(options.iteration_limit(10, 10), 0);
    }
}
