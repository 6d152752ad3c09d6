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

//! The slot-by-entity attendance matrix.
//!
//! Row `i` describes slot `i`; bit `j` of that row is set when entity `j` can
//! attend the meeting held in slot `i`. Every row is stored as a
//! `FixedBitSet`, so coverage of a selection is a union of rows and a popcount.
//!
//! The matrix is validated once at construction: at least one slot, at least
//! one entity and every row of the same width. After that it is immutable.

use crate::{
    error::ModelError,
    index::{EntityIndex, SlotIndex},
};
use fixedbitset::FixedBitSet;

/// An immutable, rectangular boolean grid of `num_slots` rows and
/// `num_entities` columns.
#[derive(Clone, PartialEq, Eq)]
pub struct AttendanceMatrix {
    rows: Vec<FixedBitSet>,
    num_entities: usize,
}

impl AttendanceMatrix {
    /// Builds a matrix from boolean rows.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyMatrix` without rows, `ModelError::NoEntities`
    /// when the first row is empty and `ModelError::RaggedRow` when a row
    /// differs in width from the first one.
    pub fn from_rows<R, C>(rows: R) -> Result<Self, ModelError>
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = bool>,
    {
        let mut bitsets = Vec::new();
        let mut width: Option<usize> = None;

        for (row, cells) in rows.into_iter().enumerate() {
            let cells: Vec<bool> = cells.into_iter().collect();
            let expected = *width.get_or_insert(cells.len());
            if expected == 0 {
                return Err(ModelError::NoEntities);
            }
            if cells.len() != expected {
                return Err(ModelError::RaggedRow {
                    row,
                    expected,
                    found: cells.len(),
                });
            }

            let mut bits = FixedBitSet::with_capacity(expected);
            for (column, _) in cells.iter().enumerate().filter(|(_, attends)| **attends) {
                bits.insert(column);
            }
            bitsets.push(bits);
        }

        match width {
            None => Err(ModelError::EmptyMatrix),
            Some(num_entities) => Ok(Self {
                rows: bitsets,
                num_entities,
            }),
        }
    }

    /// Builds a matrix from `0`/`1` integer rows.
    ///
    /// # Errors
    ///
    /// Same as [`AttendanceMatrix::from_rows`], plus
    /// `ModelError::NonBinaryCell` for any cell other than `0` or `1`.
    pub fn from_binary_rows(rows: &[Vec<i64>]) -> Result<Self, ModelError> {
        let mut grid = Vec::with_capacity(rows.len());
        for (row, cells) in rows.iter().enumerate() {
            let mut converted = Vec::with_capacity(cells.len());
            for (column, &value) in cells.iter().enumerate() {
                match value {
                    0 => converted.push(false),
                    1 => converted.push(true),
                    _ => return Err(ModelError::NonBinaryCell { row, column, value }),
                }
            }
            grid.push(converted);
        }
        Self::from_rows(grid)
    }

    /// Returns the number of slots (rows).
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of entities (columns).
    #[inline]
    pub fn num_entities(&self) -> usize {
        self.num_entities
    }

    /// Returns `true` if `entity` can attend the meeting held in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds.
    #[inline]
    pub fn attends(&self, slot: SlotIndex, entity: EntityIndex) -> bool {
        debug_assert!(
            entity.get() < self.num_entities,
            "called `AttendanceMatrix::attends` with entity index out of bounds: the len is {} but the index is {}",
            self.num_entities,
            entity.get()
        );
        self.rows[slot.get()].contains(entity.get())
    }

    /// Iterates over all slots in ascending order.
    #[inline]
    pub fn slots(&self) -> impl ExactSizeIterator<Item = SlotIndex> + '_ {
        (0..self.rows.len()).map(SlotIndex::new)
    }

    /// Iterates over the slots `entity` can attend, in ascending order.
    pub fn covering_slots(&self, entity: EntityIndex) -> impl Iterator<Item = SlotIndex> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.contains(entity.get()))
            .map(|(slot, _)| SlotIndex::new(slot))
    }

    /// Iterates over the entities no slot covers.
    pub fn uncoverable_entities(&self) -> impl Iterator<Item = EntityIndex> + '_ {
        let reachable = self.covered_entities(self.slots());
        (0..self.num_entities)
            .filter(move |&entity| !reachable.contains(entity))
            .map(EntityIndex::new)
    }

    /// Returns the set of entities that can attend at least one of `slots`.
    pub fn covered_entities<I>(&self, slots: I) -> FixedBitSet
    where
        I: IntoIterator<Item = SlotIndex>,
    {
        let mut covered = FixedBitSet::with_capacity(self.num_entities);
        for slot in slots {
            covered.union_with(&self.rows[slot.get()]);
        }
        covered
    }

    /// Returns how many distinct entities `slots` cover.
    #[inline]
    pub fn num_covered<I>(&self, slots: I) -> usize
    where
        I: IntoIterator<Item = SlotIndex>,
    {
        self.covered_entities(slots).count_ones(..)
    }

    /// Returns `true` if every entity attends at least one of `slots`.
    #[inline]
    pub fn covers_all<I>(&self, slots: I) -> bool
    where
        I: IntoIterator<Item = SlotIndex>,
    {
        self.num_covered(slots) == self.num_entities
    }
}

impl std::fmt::Debug for AttendanceMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceMatrix")
            .field("num_slots", &self.num_slots())
            .field("num_entities", &self.num_entities)
            .finish()
    }
}

impl std::fmt::Display for AttendanceMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            for entity in 0..self.num_entities {
                f.write_str(if row.contains(entity) { "1" } else { "0" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si(i: usize) -> SlotIndex {
        SlotIndex::new(i)
    }

    fn ei(j: usize) -> EntityIndex {
        EntityIndex::new(j)
    }

    fn triangle() -> AttendanceMatrix {
        AttendanceMatrix::from_binary_rows(&[vec![1, 1, 0], vec![0, 1, 1], vec![1, 0, 1]])
            .expect("valid matrix")
    }

    #[test]
    fn test_dimensions_and_cells() {
        let m = triangle();
        assert_eq!(m.num_slots(), 3);
        assert_eq!(m.num_entities(), 3);
        assert!(m.attends(si(0), ei(0)));
        assert!(!m.attends(si(0), ei(2)));
        assert!(m.attends(si(2), ei(2)));
    }

    #[test]
    fn test_rejects_empty_and_zero_width() {
        let empty: Vec<Vec<bool>> = Vec::new();
        assert_eq!(
            AttendanceMatrix::from_rows(empty),
            Err(ModelError::EmptyMatrix)
        );
        assert_eq!(
            AttendanceMatrix::from_rows(vec![Vec::<bool>::new()]),
            Err(ModelError::NoEntities)
        );
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let rows = vec![vec![true, false], vec![true]];
        assert_eq!(
            AttendanceMatrix::from_rows(rows),
            Err(ModelError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_rejects_non_binary_cells() {
        let err = AttendanceMatrix::from_binary_rows(&[vec![0, 1], vec![2, 0]]).unwrap_err();
        assert_eq!(
            err,
            ModelError::NonBinaryCell {
                row: 1,
                column: 0,
                value: 2
            }
        );
    }

    #[test]
    fn test_coverage_queries() {
        let m = triangle();
        assert_eq!(m.num_covered([si(0)]), 2);
        assert_eq!(m.num_covered([si(0), si(1)]), 3);
        assert!(m.covers_all([si(1), si(2)]));
        assert!(!m.covers_all([si(2)]));
        assert_eq!(m.num_covered(std::iter::empty()), 0);

        let slots: Vec<usize> = m.covering_slots(ei(1)).map(|s| s.get()).collect();
        assert_eq!(slots, vec![0, 1]);
    }

    #[test]
    fn test_uncoverable_entities() {
        let m = AttendanceMatrix::from_binary_rows(&[vec![1, 0, 0], vec![1, 0, 1]]).unwrap();
        let missing: Vec<usize> = m.uncoverable_entities().map(|e| e.get()).collect();
        assert_eq!(missing, vec![1]);
        assert_eq!(triangle().uncoverable_entities().count(), 0);
    }

    #[test]
    fn test_display_renders_grid() {
        assert_eq!(format!("{}", triangle()), "110\n011\n101\n");
    }
}
