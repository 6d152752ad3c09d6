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

use crate::node::Node;

/// LIFO store of open nodes for depth-first search.
///
/// Children are pushed in reverse exploration order, so the last pushed
/// child is explored first. A depth-first stack over `n` binary variables
/// never holds more than `n + 1` nodes, which is what `preallocated`
/// reserves.
#[derive(Clone, Debug, Default)]
pub struct NodeStack {
    nodes: Vec<Node>,
    high_water_mark: usize,
}

impl NodeStack {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stack with room for a full dive over `num_variables`.
    #[inline]
    pub fn preallocated(num_variables: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(num_variables.saturating_add(1)),
            high_water_mark: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
        self.high_water_mark = self.high_water_mark.max(self.nodes.len());
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Node> {
        self.nodes.pop()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Largest number of nodes held at once since the last `clear`.
    #[inline]
    pub fn high_water_mark(&self) -> usize {
        self.high_water_mark
    }

    /// Drops every node but keeps the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.high_water_mark = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convene_model::{fixing::VariableFixings, index::VariableIndex};

    fn node(ordinal: usize) -> Node {
        Node::with_fixings(VariableFixings::new(2), 0, ordinal)
    }

    #[test]
    fn test_lifo_order_and_high_water_mark() {
        let mut stack = NodeStack::preallocated(2);
        assert!(stack.is_empty());

        stack.push(node(0));
        stack.push(node(1));
        stack.push(node(2));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop().map(|n| n.ordinal()), Some(2));
        assert_eq!(stack.pop().map(|n| n.ordinal()), Some(1));
        assert_eq!(stack.high_water_mark(), 3);

        let root = node(0);
        stack.push(root.child(VariableIndex::new(0), true, 1));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.high_water_mark(), 0);
        assert_eq!(stack.pop(), None);
    }
}
