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

//! Dense row-major simplex tableau.

/// Entries below this magnitude are flushed to zero after elimination.
const ZERO_FLUSH: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tableau {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl Tableau {
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            data: vec![0.0; rows * columns],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline(always)]
    pub fn at(&self, row: usize, column: usize) -> f64 {
        debug_assert!(row < self.rows && column < self.columns);
        self.data[row * self.columns + column]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        debug_assert!(row < self.rows && column < self.columns);
        self.data[row * self.columns + column] = value;
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.columns..(row + 1) * self.columns]
    }

    /// Scales `row` so that `(row, column)` becomes 1 and eliminates
    /// `column` from every other row.
    ///
    /// The caller guarantees the pivot entry is non-zero.
    pub fn pivot(&mut self, row: usize, column: usize) {
        let columns = self.columns;
        let inverse = 1.0 / self.at(row, column);
        let (before, rest) = self.data.split_at_mut(row * columns);
        let (pivot_row, after) = rest.split_at_mut(columns);

        for value in pivot_row.iter_mut() {
            *value *= inverse;
        }
        pivot_row[column] = 1.0;

        for other in before
            .chunks_exact_mut(columns)
            .chain(after.chunks_exact_mut(columns))
        {
            let factor = other[column];
            if factor == 0.0 {
                continue;
            }
            for (value, &p) in other.iter_mut().zip(pivot_row.iter()) {
                *value -= factor * p;
                if value.abs() < ZERO_FLUSH {
                    *value = 0.0;
                }
            }
            other[column] = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pivot_produces_unit_column() {
        // [2 4 | ]
        // [1 3 | ]
        let mut t = Tableau::zeros(2, 2);
        t.set(0, 0, 2.0);
        t.set(0, 1, 4.0);
        t.set(1, 0, 1.0);
        t.set(1, 1, 3.0);

        t.pivot(0, 0);
        assert_eq!(t.row(0), &[1.0, 2.0]);
        assert_eq!(t.row(1), &[0.0, 1.0]);

        t.pivot(1, 1);
        assert_eq!(t.row(0), &[1.0, 0.0]);
        assert_eq!(t.row(1), &[0.0, 1.0]);
        assert_eq!((t.rows(), t.columns()), (2, 2));
    }
}
