use tracing::debug;

use crate::{AvlError, AvlForest, AvlTree};

impl AvlForest {
    /// Splits `tree` at `key` into the trees of strictly smaller and strictly
    /// larger keys. The entry under `key` is dropped.
    ///
    /// The two subtrees of `key`'s node seed the results. Walking up to the
    /// root, each ancestor becomes a join pivot that folds its other subtree
    /// into the side the walk came from, so ranks telescope and the whole split
    /// costs `O(log n)`.
    ///
    /// On success `tree` is left empty. An absent `key` yields
    /// [`AvlError::KeyNotFound`] and leaves `tree` untouched.
    pub fn split(&mut self, tree: &mut AvlTree, key: i64) -> Result<(AvlTree, AvlTree), AvlError> {
        let node = self.find(tree.root, key);
        if node == Self::NIL || self.node(node).key != key {
            return Err(AvlError::KeyNotFound(key));
        }
        let size = self.size(tree);
        *tree = AvlTree::new();

        let (mut smaller, mut larger) = (self.node(node).left, self.node(node).right);
        self.set_parent(smaller, Self::NIL);
        self.set_parent(larger, Self::NIL);

        let mut child = node;
        let mut parent = self.node(node).parent;

        while parent != Self::NIL {
            let next = self.node(parent).parent;
            let (left, right) = (self.node(parent).left, self.node(parent).right);
            self.isolate(parent);

            if right == child {
                self.set_parent(left, Self::NIL);
                smaller = self.join_roots(left, parent, smaller);
            } else {
                self.set_parent(right, Self::NIL);
                larger = self.join_roots(larger, parent, right);
            }

            child = parent;
            parent = next;
        }

        self.release(node);

        let mut smaller = AvlTree::from_root(smaller);
        let mut larger = AvlTree::from_root(larger);
        self.refresh_extremes(&mut smaller);
        self.refresh_extremes(&mut larger);

        debug!(
            key,
            size,
            smaller = self.size(&smaller),
            larger = self.size(&larger),
            "split"
        );

        Ok((smaller, larger))
    }
}
