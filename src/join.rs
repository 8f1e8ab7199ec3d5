use alloc::string::String;

use tracing::debug;

use crate::{AvlError, AvlForest, AvlTree, NodeIndex};

impl AvlForest {
    /// Joins `other` into `tree` around a new pivot entry `key`/`value`.
    ///
    /// `key` must lie strictly between the keys of the two trees, in either
    /// order: every key of `tree` below it and every key of `other` above it,
    /// or the reverse. Otherwise [`AvlError::NonSeparatingPivot`] is returned
    /// and neither tree changes.
    ///
    /// On success `other` is left empty and `tree` holds the union. Returns the
    /// cost of the join, `|rank(tree) - rank(other)| + 1`, which bounds the
    /// number of spine nodes visited.
    pub fn join(
        &mut self,
        tree: &mut AvlTree,
        key: i64,
        value: String,
        other: &mut AvlTree,
    ) -> Result<usize, AvlError> {
        let tree_is_low = if self.separates(tree, key, other) {
            true
        } else if self.separates(other, key, tree) {
            false
        } else {
            return Err(AvlError::NonSeparatingPivot(key));
        };

        let cost = (self.rank(tree) - self.rank(other)).unsigned_abs() as usize + 1;
        let other = core::mem::take(other);
        let (low, high) = if tree_is_low {
            (core::mem::take(tree), other)
        } else {
            (other, core::mem::take(tree))
        };

        let pivot = self.alloc(key, value);
        let min = if low.is_empty() { pivot } else { low.min };
        let max = if high.is_empty() { pivot } else { high.max };

        tree.root = self.join_roots(low.root, pivot, high.root);
        tree.min = min;
        tree.max = max;

        debug!(key, cost, size = self.size(tree), rank = self.rank(tree), "joined");

        Ok(cost)
    }

    fn separates(&self, low: &AvlTree, key: i64, high: &AvlTree) -> bool {
        self.max_key(low).is_none_or(|max| max < key) && self.min_key(high).is_none_or(|min| min > key)
    }

    /// Links the detached trees rooted at `low` and `high` below the detached
    /// `pivot` and returns the root of the balanced result.
    ///
    /// When the ranks differ by more than one the taller tree's inner spine is
    /// descended to the first node no taller than the shorter tree; the pivot
    /// takes that node's place and the insertion rebalancer repairs the path
    /// above it. Cached extremes are left to the caller.
    pub(crate) fn join_roots(&mut self, low: NodeIndex, pivot: NodeIndex, high: NodeIndex) -> NodeIndex {
        let low_rank = self.rank_of(low);
        let high_rank = self.rank_of(high);

        if (low_rank - high_rank).abs() <= 1 {
            self.link(pivot, low, high);
            self.node_mut(pivot).parent = Self::NIL;

            return pivot;
        }

        let added = if low_rank > high_rank {
            self.size_of(high) + 1
        } else {
            self.size_of(low) + 1
        };

        if low_rank > high_rank {
            let mut root = low;
            let mut parent = Self::NIL;
            let mut spine = low;

            while self.rank_of(spine) > high_rank {
                self.node_mut(spine).size += added;
                parent = spine;
                spine = self.node(spine).right;
            }

            self.link(pivot, spine, high);
            self.node_mut(parent).right = pivot;
            self.node_mut(pivot).parent = parent;
            self.rebalance_insertion(&mut root, parent);

            root
        } else {
            let mut root = high;
            let mut parent = Self::NIL;
            let mut spine = high;

            while self.rank_of(spine) > low_rank {
                self.node_mut(spine).size += added;
                parent = spine;
                spine = self.node(spine).left;
            }

            self.link(pivot, low, spine);
            self.node_mut(parent).left = pivot;
            self.node_mut(pivot).parent = parent;
            self.rebalance_insertion(&mut root, parent);

            root
        }
    }

    /// Hangs `left` and `right` below `pivot` and derives its rank and size.
    fn link(&mut self, pivot: NodeIndex, left: NodeIndex, right: NodeIndex) {
        self.set_parent(left, pivot);
        self.set_parent(right, pivot);

        let rank = self.rank_of(left).max(self.rank_of(right)) + 1;
        let size = self.size_of(left) + self.size_of(right) + 1;

        let node = self.node_mut(pivot);
        node.left = left;
        node.right = right;
        node.rank = rank;
        node.size = size;
    }
}
