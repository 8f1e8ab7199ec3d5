//! Rank-balanced (AVL) ordered maps from `i64` keys to `String` values that
//! can be split at a key and joined around a pivot in logarithmic time.
//!
//! Every node lives in an [`AvlForest`] arena. An [`AvlTree`] is a handle onto
//! one tree inside a forest: it owns the tree's root and caches its extreme
//! nodes. Splitting and joining only rewire arena indices, so whole node sets
//! move between handles without being copied. [`AvlMap`] bundles a forest with
//! a single tree for callers that never split or join.
//!
//! ```
//! use avlwood::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key.to_string()).unwrap();
//! }
//!
//! assert_eq!(map.keys_in_order(), vec![1, 3, 4, 5, 7, 8, 9]);
//! assert_eq!(map.min(), Some("1"));
//! ```

extern crate alloc;

use core::cmp::Ordering;

use alloc::string::String;
use alloc::vec::Vec;

mod delete;
mod error;
mod insert;
mod iter;
mod join;
mod map;
mod split;
mod validate;

pub use error::AvlError;
pub use iter::AvlInorderIterator;
pub use map::AvlMap;
pub use validate::InvariantViolation;

/*
vacant cells form a linked list whose head is kept in the forest:
- allocating a cell pops the head, new head = storage[head].parent
- freeing a cell sets storage[cell].parent = head, then head = cell

cell 0 is the external sentinel shared by every tree of the forest. it is only
ever read, so its rank (-1) and size (0) stay valid for rank/size arithmetic.
*/

/// Key reported by the external sentinel.
pub const SENTINEL_KEY: i64 = -1;

const SENTINEL_RANK: i32 = -1;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

#[derive(Debug)]
pub(crate) struct AvlNode {
    pub(crate) key: i64,
    pub(crate) value: Option<String>,
    pub(crate) rank: i32,
    pub(crate) size: usize,
    pub(crate) parent: NodeIndex,
    pub(crate) left: NodeIndex,
    pub(crate) right: NodeIndex,
}

impl AvlNode {
    fn new_leaf(key: i64, value: String) -> Self {
        Self {
            key,
            value: Some(value),
            rank: 0,
            size: 1,
            parent: AvlForest::NIL,
            left: AvlForest::NIL,
            right: AvlForest::NIL,
        }
    }

    fn vacant(next_free: NodeIndex) -> Self {
        Self {
            key: SENTINEL_KEY,
            value: None,
            rank: SENTINEL_RANK,
            size: 0,
            parent: next_free,
            left: AvlForest::NIL,
            right: AvlForest::NIL,
        }
    }

    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }
}

/// Handle onto one tree stored in an [`AvlForest`].
///
/// The handle owns the tree's nodes. It is intentionally neither `Clone` nor
/// `Copy`: [`AvlForest::split`] consumes it and [`AvlForest::join`] consumes
/// the donor tree, so a node set can never be reachable from two handles.
///
/// A handle must only be used with the forest its nodes were allocated in.
#[derive(Debug, Default)]
pub struct AvlTree {
    pub(crate) root: NodeIndex,
    pub(crate) min: NodeIndex,
    pub(crate) max: NodeIndex,
}

impl AvlTree {
    /// Creates an empty tree, valid in any forest.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: AvlForest::NIL,
            min: AvlForest::NIL,
            max: AvlForest::NIL,
        }
    }

    pub(crate) const fn from_root(root: NodeIndex) -> Self {
        Self {
            root,
            min: AvlForest::NIL,
            max: AvlForest::NIL,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root == AvlForest::NIL
    }
}

/// Arena holding the nodes of any number of [`AvlTree`]s.
#[derive(Debug)]
pub struct AvlForest {
    storage: Vec<AvlNode>,
    free_head: NodeIndex,
    live: usize,
}

impl AvlForest {
    pub(crate) const NIL: NodeIndex = NodeIndex(0);

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a forest with room for `capacity` nodes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Vec::with_capacity(capacity + 1);
        storage.push(AvlNode::vacant(Self::NIL));

        Self {
            storage,
            free_head: Self::NIL,
            live: 0,
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.storage.reserve(additional);
    }

    /// Number of real nodes across every tree of the forest.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// Runs in `O(log n)`.
    #[must_use]
    pub fn search(&self, tree: &AvlTree, key: i64) -> Option<&str> {
        let node = self.find(tree.root, key);

        if node != Self::NIL && self.node(node).key == key {
            self.node(node).value.as_deref()
        } else {
            None
        }
    }

    #[must_use]
    pub fn contains(&self, tree: &AvlTree, key: i64) -> bool {
        self.search(tree, key).is_some()
    }

    /// Number of entries in `tree`, read from the root in `O(1)`.
    #[must_use]
    pub fn size(&self, tree: &AvlTree) -> usize {
        self.size_of(tree.root)
    }

    /// Rank (height) of `tree`; an empty tree has rank -1.
    #[must_use]
    pub fn rank(&self, tree: &AvlTree) -> i32 {
        self.rank_of(tree.root)
    }

    #[must_use]
    pub fn root_key(&self, tree: &AvlTree) -> Option<i64> {
        self.real_key(tree.root)
    }

    /// Value stored under the smallest key, in `O(1)`.
    #[must_use]
    pub fn min(&self, tree: &AvlTree) -> Option<&str> {
        self.node(tree.min).value.as_deref()
    }

    /// Value stored under the largest key, in `O(1)`.
    #[must_use]
    pub fn max(&self, tree: &AvlTree) -> Option<&str> {
        self.node(tree.max).value.as_deref()
    }

    #[must_use]
    pub fn min_key(&self, tree: &AvlTree) -> Option<i64> {
        self.real_key(tree.min)
    }

    #[must_use]
    pub fn max_key(&self, tree: &AvlTree) -> Option<i64> {
        self.real_key(tree.max)
    }

    /// Keys of `tree` in ascending order.
    #[must_use]
    pub fn keys_in_order(&self, tree: &AvlTree) -> Vec<i64> {
        self.iter(tree).map(|(key, _)| key).collect()
    }

    /// Values of `tree`, ordered by their keys.
    #[must_use]
    pub fn values_in_order(&self, tree: &AvlTree) -> Vec<String> {
        self.iter(tree).map(|(_, value)| String::from(value)).collect()
    }

    /// Releases every node of `tree` back to the arena.
    pub fn clear(&mut self, tree: AvlTree) {
        let mut stack = alloc::vec![tree.root];

        while let Some(node) = stack.pop() {
            if node == Self::NIL {
                continue;
            }
            stack.push(self.node(node).left);
            stack.push(self.node(node).right);
            self.release(node);
        }
    }

    pub(crate) fn node(&self, idx: NodeIndex) -> &AvlNode {
        &self.storage[idx.0]
    }

    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut AvlNode {
        debug_assert_ne!(idx, Self::NIL, "the sentinel must never be written");
        &mut self.storage[idx.0]
    }

    pub(crate) fn rank_of(&self, idx: NodeIndex) -> i32 {
        self.node(idx).rank
    }

    pub(crate) fn size_of(&self, idx: NodeIndex) -> usize {
        self.node(idx).size
    }

    fn real_key(&self, idx: NodeIndex) -> Option<i64> {
        (idx != Self::NIL).then(|| self.node(idx).key)
    }

    /// Rank differences `(rank - rank(left), rank - rank(right))` of `node`.
    pub(crate) fn rank_diffs(&self, node: NodeIndex) -> (i32, i32) {
        let n = self.node(node);
        (n.rank - self.rank_of(n.left), n.rank - self.rank_of(n.right))
    }

    pub(crate) fn alloc(&mut self, key: i64, value: String) -> NodeIndex {
        self.live += 1;

        if self.free_head == Self::NIL {
            self.storage.push(AvlNode::new_leaf(key, value));
            return NodeIndex(self.storage.len() - 1);
        }

        let idx = self.free_head;
        self.free_head = self.storage[idx.0].parent;
        self.storage[idx.0] = AvlNode::new_leaf(key, value);

        idx
    }

    pub(crate) fn release(&mut self, idx: NodeIndex) {
        let next_free = self.free_head;
        *self.node_mut(idx) = AvlNode::vacant(next_free);
        self.free_head = idx;
        self.live -= 1;
    }

    /// Turns a node that is about to serve as a join pivot back into a
    /// detached leaf.
    pub(crate) fn isolate(&mut self, idx: NodeIndex) {
        let node = self.node_mut(idx);
        node.parent = Self::NIL;
        node.left = Self::NIL;
        node.right = Self::NIL;
        node.rank = 0;
        node.size = 1;
    }

    pub(crate) fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child != Self::NIL {
            self.node_mut(child).parent = parent;
        }
    }

    /// Puts `new` in the slot of `parent` currently holding `old`, or makes it
    /// the root when `parent` is the sentinel. `new`'s parent link is left to
    /// the caller.
    pub(crate) fn replace_child(
        &mut self,
        root: &mut NodeIndex,
        parent: NodeIndex,
        old: NodeIndex,
        new: NodeIndex,
    ) {
        if parent == Self::NIL {
            *root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    pub(crate) fn update_size(&mut self, idx: NodeIndex) {
        let node = self.node(idx);
        let size = self.size_of(node.left) + self.size_of(node.right) + 1;
        self.node_mut(idx).size = size;
    }

    pub(crate) fn promote(&mut self, idx: NodeIndex) {
        self.node_mut(idx).rank += 1;
    }

    pub(crate) fn demote(&mut self, idx: NodeIndex) {
        self.node_mut(idx).rank -= 1;
    }

    /// Rotates `child` (the left child of `center`) above `center`.
    ///
    /// Sizes of both nodes are recomputed; ranks are left to the caller.
    pub(crate) fn rotate_right(&mut self, root: &mut NodeIndex, center: NodeIndex, child: NodeIndex) {
        let grandparent_idx = self.node(center).parent;
        let crossing = self.node(child).right;

        self.node_mut(center).left = crossing;
        self.set_parent(crossing, center);

        self.node_mut(child).right = center;
        self.node_mut(center).parent = child;
        self.node_mut(child).parent = grandparent_idx;

        self.replace_child(root, grandparent_idx, center, child);

        self.update_size(center);
        self.update_size(child);
    }

    /// Rotates `child` (the right child of `center`) above `center`.
    ///
    /// Sizes of both nodes are recomputed; ranks are left to the caller.
    pub(crate) fn rotate_left(&mut self, root: &mut NodeIndex, center: NodeIndex, child: NodeIndex) {
        let grandparent_idx = self.node(center).parent;
        let crossing = self.node(child).left;

        self.node_mut(center).right = crossing;
        self.set_parent(crossing, center);

        self.node_mut(child).left = center;
        self.node_mut(center).parent = child;
        self.node_mut(child).parent = grandparent_idx;

        self.replace_child(root, grandparent_idx, center, child);

        self.update_size(center);
        self.update_size(child);
    }

    /// Descends from `root` towards `key`.
    ///
    /// Returns the node holding `key`, or on a miss the last real node visited
    /// (the parent an insertion would attach to). Returns the sentinel only
    /// for an empty tree.
    pub(crate) fn find(&self, root: NodeIndex, key: i64) -> NodeIndex {
        let mut current_node = root;
        let mut last_real = Self::NIL;

        while current_node != Self::NIL {
            last_real = current_node;
            let curr_node_storage = self.node(current_node);

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => current_node = curr_node_storage.left,
                Ordering::Equal => return current_node,
                Ordering::Greater => current_node = curr_node_storage.right,
            }
        }

        last_real
    }

    /// Same descent as [`Self::find`], adding `delta` to the size of every
    /// node visited, the returned node included.
    pub(crate) fn find_adjusting(&mut self, root: NodeIndex, key: i64, delta: isize) -> NodeIndex {
        let mut current_node = root;
        let mut last_real = Self::NIL;

        while current_node != Self::NIL {
            last_real = current_node;
            let curr_node_storage = self.node_mut(current_node);
            curr_node_storage.size = curr_node_storage.size.wrapping_add_signed(delta);

            match key.cmp(&curr_node_storage.key) {
                Ordering::Less => current_node = curr_node_storage.left,
                Ordering::Equal => return current_node,
                Ordering::Greater => current_node = curr_node_storage.right,
            }
        }

        last_real
    }

    pub(crate) fn leftmost(&self, root: NodeIndex) -> NodeIndex {
        let mut node = root;
        while node != Self::NIL && self.node(node).left != Self::NIL {
            node = self.node(node).left;
        }

        node
    }

    pub(crate) fn rightmost(&self, root: NodeIndex) -> NodeIndex {
        let mut node = root;
        while node != Self::NIL && self.node(node).right != Self::NIL {
            node = self.node(node).right;
        }

        node
    }

    /// Recomputes the cached extremes of `tree` by descent.
    pub(crate) fn refresh_extremes(&self, tree: &mut AvlTree) {
        tree.min = self.leftmost(tree.root);
        tree.max = self.rightmost(tree.root);
    }
}

impl Default for AvlForest {
    fn default() -> Self {
        Self::new()
    }
}
