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

use convene_model::{fixing::VariableFixings, index::VariableIndex, problem::Problem};

/// A search-tree node: a partial 0/1 assignment awaiting its relaxation.
///
/// `parent_bound` is the rounded relaxation bound of the parent, used to
/// prune the node before its own relaxation is solved. `ordinal` is the
/// position of the subtree root in the search frontier; every node of a
/// subtree shares it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    fixings: VariableFixings,
    parent_bound: Option<i64>,
    depth: usize,
    ordinal: usize,
}

impl Node {
    /// The root node of `problem`: nothing fixed.
    #[inline]
    pub fn root(problem: &Problem) -> Self {
        Self {
            fixings: VariableFixings::for_problem(problem),
            parent_bound: None,
            depth: 0,
            ordinal: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_fixings(fixings: VariableFixings, depth: usize, ordinal: usize) -> Self {
        Self {
            fixings,
            parent_bound: None,
            depth,
            ordinal,
        }
    }

    /// The child that additionally fixes `variable` to `value`.
    #[inline]
    pub fn child(&self, variable: VariableIndex, value: bool, bound: i64) -> Self {
        debug_assert!(
            !self.fixings.is_fixed(variable),
            "called `Node::child` on already fixed variable {}",
            variable
        );

        Self {
            fixings: self.fixings.with_fixed(variable, value),
            parent_bound: Some(bound),
            depth: self.depth + 1,
            ordinal: self.ordinal,
        }
    }

    #[inline]
    pub fn fixings(&self) -> &VariableFixings {
        &self.fixings
    }

    #[inline]
    pub fn parent_bound(&self) -> Option<i64> {
        self.parent_bound
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    #[inline]
    pub(crate) fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_inherits_ordinal_and_fixings() {
        let fixings = VariableFixings::new(3).with_fixed(VariableIndex::new(0), true);
        let parent = Node::with_fixings(fixings, 1, 4);
        let child = parent.child(VariableIndex::new(2), false, 7);

        assert_eq!(child.depth(), 2);
        assert_eq!(child.ordinal(), 4);
        assert_eq!(child.parent_bound(), Some(7));
        assert_eq!(child.fixings().value(VariableIndex::new(0)), Some(true));
        assert_eq!(child.fixings().value(VariableIndex::new(2)), Some(false));
        assert_eq!(child.fixings().value(VariableIndex::new(1)), None);
        assert!(!child.is_root());
        assert_eq!(parent.fixings().num_fixed(), 1);
    }
}
