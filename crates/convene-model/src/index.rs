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

//! Typed indices for the attendance and integer-program domains.
//!
//! Slots, entities, program variables and constraints all live in their own
//! `usize` index space. `TypedIndex<T>` tags a raw index with a zero-sized
//! marker so that a `SlotIndex` can never be passed where a `VariableIndex`
//! is expected. The wrapper is `#[repr(transparent)]` and compiles down to a
//! bare `usize`.

use std::marker::PhantomData;

/// Names an index space for `Debug` and `Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index bound to the index space `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Wraps a raw index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Returns the raw index.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(index: TypedIndex<T>) -> Self {
        index.index
    }
}

macro_rules! typed_index {
    ($(#[$doc:meta])* $alias:ident, $tag:ident, $name:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $tag;

        impl TypedIndexTag for $tag {
            const NAME: &'static str = $name;
        }

        $(#[$doc])*
        pub type $alias = TypedIndex<$tag>;
    };
}

typed_index!(
    /// A row of the attendance matrix (a candidate meeting time).
    SlotIndex,
    SlotIndexTag,
    "SlotIndex"
);
typed_index!(
    /// A column of the attendance matrix (a person).
    EntityIndex,
    EntityIndexTag,
    "EntityIndex"
);
typed_index!(
    /// A binary decision variable of a `Problem`.
    VariableIndex,
    VariableIndexTag,
    "VariableIndex"
);
typed_index!(
    /// A linear constraint of a `Problem`.
    ConstraintIndex,
    ConstraintIndexTag,
    "ConstraintIndex"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_get_and_conversions() {
        let slot = SlotIndex::new(4);
        assert_eq!(slot.get(), 4);

        let raw: usize = slot.into();
        assert_eq!(raw, 4);

        let var: VariableIndex = 9.into();
        assert_eq!(var.get(), 9);
    }

    #[test]
    fn test_display_uses_index_space_name() {
        assert_eq!(format!("{}", SlotIndex::new(2)), "SlotIndex(2)");
        assert_eq!(format!("{:?}", EntityIndex::new(0)), "EntityIndex(0)");
        assert_eq!(format!("{}", ConstraintIndex::new(7)), "ConstraintIndex(7)");
    }

    #[test]
    fn test_ordering_follows_raw_index() {
        let mut vars = vec![VariableIndex::new(3), VariableIndex::new(1), VariableIndex::new(2)];
        vars.sort();
        let raw: Vec<usize> = vars.iter().map(|v| v.get()).collect();
        assert_eq!(raw, vec![1, 2, 3]);
    }
}
