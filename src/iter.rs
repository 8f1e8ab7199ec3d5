use alloc::vec::Vec;

use crate::{AvlForest, AvlTree, NodeIndex};

/// In-order iterator over the entries of one tree, yielding `(key, value)`.
pub struct AvlInorderIterator<'a> {
    pub(crate) forest: &'a AvlForest,
    pub(crate) curr: NodeIndex,
    pub(crate) stack: Vec<NodeIndex>,
    pub(crate) remaining: usize,
}

impl<'a> Iterator for AvlInorderIterator<'a> {
    type Item = (i64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr != AvlForest::NIL {
            self.stack.push(self.curr);
            self.curr = self.forest.node(self.curr).left_child();
        }

        let node = self.forest.node(self.stack.pop()?);
        self.curr = node.right_child();
        self.remaining -= 1;

        Some((node.key, node.value.as_deref().unwrap_or_default()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for AvlInorderIterator<'_> {}

impl AvlForest {
    /// Iterates over `tree` in ascending key order.
    #[must_use]
    pub fn iter<'a>(&'a self, tree: &AvlTree) -> AvlInorderIterator<'a> {
        AvlInorderIterator {
            forest: self,
            curr: tree.root,
            stack: Vec::with_capacity(self.rank(tree).max(0) as usize + 1),
            remaining: self.size(tree),
        }
    }
}
