use tracing::trace;

use crate::{AvlError, AvlForest, AvlTree, NodeIndex};

/// How many real children a node has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeShape {
    Leaf,
    Unary(NodeIndex),
    Binary,
}

impl AvlForest {
    /// Removes `key` from `tree`.
    ///
    /// Returns the number of rebalancing operations performed, or
    /// [`AvlError::KeyNotFound`] without touching the tree.
    pub fn delete(&mut self, tree: &mut AvlTree, key: i64) -> Result<usize, AvlError> {
        let hit = self.find(tree.root, key);
        if hit == Self::NIL || self.node(hit).key != key {
            return Err(AvlError::KeyNotFound(key));
        }

        let node = self.find_adjusting(tree.root, key, -1);

        let child = match self.shape(node) {
            NodeShape::Leaf => Self::NIL,
            NodeShape::Unary(child) => child,
            NodeShape::Binary => {
                let successor = self.successor_adjusting(node);
                self.swap_with_successor(&mut tree.root, node, successor);
                self.update_size(successor);

                // the successor had no left child, neither has `node` now
                self.node(node).right
            }
        };

        let parent = self.node(node).parent;
        self.splice_out(&mut tree.root, node, child);
        self.release(node);

        let ops = self.rebalance_deletion(&mut tree.root, parent);
        self.refresh_extremes(tree);
        trace!(key, ops, "deleted");

        Ok(ops)
    }

    fn shape(&self, idx: NodeIndex) -> NodeShape {
        let node = self.node(idx);

        match (node.left == Self::NIL, node.right == Self::NIL) {
            (true, true) => NodeShape::Leaf,
            (true, false) => NodeShape::Unary(node.right),
            (false, true) => NodeShape::Unary(node.left),
            (false, false) => NodeShape::Binary,
        }
    }

    /// Leftmost node of the right subtree of `idx`, decrementing the size of
    /// every node on the way down, the successor included.
    fn successor_adjusting(&mut self, idx: NodeIndex) -> NodeIndex {
        let mut node = self.node(idx).right;
        let mut successor = node;

        while node != Self::NIL {
            self.node_mut(node).size -= 1;
            successor = node;
            node = self.node(node).left;
        }

        successor
    }

    /// Exchanges the structural positions of `node` and its in-order
    /// successor. Rank and size belong to the position and move with it.
    fn swap_with_successor(&mut self, root: &mut NodeIndex, node: NodeIndex, successor: NodeIndex) {
        let (node_parent, node_left, node_right) = {
            let n = self.node(node);
            (n.parent, n.left, n.right)
        };
        let (succ_parent, succ_left, succ_right) = {
            let s = self.node(successor);
            (s.parent, s.left, s.right)
        };

        self.replace_child(root, node_parent, node, successor);
        self.node_mut(successor).parent = node_parent;

        self.node_mut(successor).left = node_left;
        self.set_parent(node_left, successor);

        if succ_parent == node {
            self.node_mut(successor).right = node;
            self.node_mut(node).parent = successor;
        } else {
            self.node_mut(successor).right = node_right;
            self.set_parent(node_right, successor);
            self.node_mut(succ_parent).left = node;
            self.node_mut(node).parent = succ_parent;
        }

        self.node_mut(node).left = succ_left;
        self.set_parent(succ_left, node);
        self.node_mut(node).right = succ_right;
        self.set_parent(succ_right, node);

        let node_rank = self.node(node).rank;
        let succ_rank = self.node(successor).rank;
        self.node_mut(node).rank = succ_rank;
        self.node_mut(successor).rank = node_rank;

        let node_size = self.node(node).size;
        let succ_size = self.node(successor).size;
        self.node_mut(node).size = succ_size;
        self.node_mut(successor).size = node_size;
    }

    /// Unlinks a leaf or unary node, putting `child` (possibly the sentinel)
    /// in its place.
    fn splice_out(&mut self, root: &mut NodeIndex, idx: NodeIndex, child: NodeIndex) {
        let parent = self.node(idx).parent;

        self.replace_child(root, parent, idx, child);
        self.set_parent(child, parent);
    }

    /// Restores rank balance upward from `start` after one of its subtrees
    /// lost a rank.
    ///
    /// Rotations may lower the rotated subtree, so the walk resumes above it
    /// rather than stopping.
    pub(crate) fn rebalance_deletion(&mut self, root: &mut NodeIndex, start: NodeIndex) -> usize {
        let mut ops = 0;
        let mut node = start;

        while node != Self::NIL {
            match self.rank_diffs(node) {
                (2, 2) => {
                    self.demote(node);
                    ops += 1;
                    node = self.node(node).parent;
                }
                (3, 1) => {
                    let child = self.node(node).right;

                    match self.rank_diffs(child) {
                        (1, 1) => {
                            self.rotate_left(root, node, child);
                            self.demote(node);
                            self.promote(child);
                            ops += 3;
                        }
                        (2, 1) => {
                            self.rotate_left(root, node, child);
                            self.demote(node);
                            self.demote(node);
                            ops += 3;
                        }
                        (1, 2) => {
                            let grandchild = self.node(child).left;
                            self.rotate_right(root, child, grandchild);
                            self.rotate_left(root, node, grandchild);
                            self.demote(node);
                            self.demote(node);
                            self.promote(grandchild);
                            self.demote(child);
                            ops += 6;
                        }
                        _ => {}
                    }
                    node = self.grandparent(node);
                }
                (1, 3) => {
                    let child = self.node(node).left;

                    match self.rank_diffs(child) {
                        (1, 1) => {
                            self.rotate_right(root, node, child);
                            self.demote(node);
                            self.promote(child);
                            ops += 3;
                        }
                        (1, 2) => {
                            self.rotate_right(root, node, child);
                            self.demote(node);
                            self.demote(node);
                            ops += 3;
                        }
                        (2, 1) => {
                            let grandchild = self.node(child).right;
                            self.rotate_left(root, child, grandchild);
                            self.rotate_right(root, node, grandchild);
                            self.demote(node);
                            self.demote(node);
                            self.promote(grandchild);
                            self.demote(child);
                            ops += 6;
                        }
                        _ => {}
                    }
                    node = self.grandparent(node);
                }
                // 1,1 / 1,2 / 2,1: nothing changes here, keep checking above
                _ => node = self.node(node).parent,
            }
        }

        ops
    }

    fn grandparent(&self, idx: NodeIndex) -> NodeIndex {
        let parent = self.node(idx).parent;
        self.node(parent).parent
    }
}
