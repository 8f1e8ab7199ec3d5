use alloc::string::String;

use tracing::trace;

use crate::{AvlError, AvlForest, AvlTree, NodeIndex};

impl AvlForest {
    /// Inserts `key` with `value` into `tree`.
    ///
    /// Returns the number of rebalancing operations (promotions, demotions and
    /// rotations) performed. A key already present is rejected with
    /// [`AvlError::DuplicateKey`] and the tree is left untouched.
    pub fn insert(&mut self, tree: &mut AvlTree, key: i64, value: String) -> Result<usize, AvlError> {
        if tree.is_empty() {
            let node = self.alloc(key, value);
            tree.root = node;
            tree.min = node;
            tree.max = node;

            return Ok(0);
        }

        // sizes are only touched once the key is known to be new
        let hit = self.find(tree.root, key);
        if self.node(hit).key == key {
            return Err(AvlError::DuplicateKey(key));
        }

        let parent = self.find_adjusting(tree.root, key, 1);
        let node = self.alloc(key, value);

        if key < self.node(parent).key {
            self.node_mut(parent).left = node;
        } else {
            self.node_mut(parent).right = node;
        }
        self.node_mut(node).parent = parent;

        if key < self.node(tree.min).key {
            tree.min = node;
        }
        if key > self.node(tree.max).key {
            tree.max = node;
        }

        let ops = self.rebalance_insertion(&mut tree.root, parent);
        trace!(key, ops, "inserted");

        Ok(ops)
    }

    /// Restores rank balance upward from `start` after one of its subtrees grew
    /// by one rank.
    ///
    /// A promotion pushes the problem to the parent. A rotation ends the walk
    /// unless it raised the subtree, which only happens when the heavy child
    /// is 1,1 (a join can produce that, a plain insertion cannot).
    pub(crate) fn rebalance_insertion(&mut self, root: &mut NodeIndex, start: NodeIndex) -> usize {
        let mut ops = 0;
        let mut node = start;

        while node != Self::NIL {
            match self.rank_diffs(node) {
                (0, 1) | (1, 0) => {
                    self.promote(node);
                    ops += 1;
                    node = self.node(node).parent;
                }
                (0, 2) => {
                    let child = self.node(node).left;

                    match self.rank_diffs(child) {
                        (1, 2) => {
                            self.rotate_right(root, node, child);
                            self.demote(node);
                            ops += 2;
                            break;
                        }
                        (2, 1) => {
                            let grandchild = self.node(child).right;
                            self.rotate_left(root, child, grandchild);
                            self.rotate_right(root, node, grandchild);
                            self.demote(node);
                            self.demote(child);
                            self.promote(grandchild);
                            ops += 5;
                            break;
                        }
                        (1, 1) => {
                            self.rotate_right(root, node, child);
                            self.promote(child);
                            ops += 2;
                            node = self.node(child).parent;
                        }
                        _ => break,
                    }
                }
                (2, 0) => {
                    let child = self.node(node).right;

                    match self.rank_diffs(child) {
                        (2, 1) => {
                            self.rotate_left(root, node, child);
                            self.demote(node);
                            ops += 2;
                            break;
                        }
                        (1, 2) => {
                            let grandchild = self.node(child).left;
                            self.rotate_right(root, child, grandchild);
                            self.rotate_left(root, node, grandchild);
                            self.demote(node);
                            self.demote(child);
                            self.promote(grandchild);
                            ops += 5;
                            break;
                        }
                        (1, 1) => {
                            self.rotate_left(root, node, child);
                            self.promote(child);
                            ops += 2;
                            node = self.node(child).parent;
                        }
                        _ => break,
                    }
                }
                _ => break,
            }
        }

        ops
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::{AvlError, AvlForest, AvlTree};

    #[test]
    pub fn empty_tree_insertion() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        assert_eq!(forest.insert(&mut tree, 5, "five".to_string()), Ok(0));
        assert_eq!(forest.root_key(&tree), Some(5));
        assert_eq!(forest.min(&tree), Some("five"));
        assert_eq!(forest.max(&tree), Some("five"));
        assert_eq!(forest.rank(&tree), 0);
    }

    #[test]
    pub fn promotion_only_path() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        forest.insert(&mut tree, 5, "5".to_string()).unwrap();
        // the root turns 0,1 and gets promoted
        assert_eq!(forest.insert(&mut tree, 3, "3".to_string()), Ok(1));
        // the root turns 1,1, nothing to do
        assert_eq!(forest.insert(&mut tree, 8, "8".to_string()), Ok(0));
        assert_eq!(forest.rank(&tree), 1);
    }

    #[test]
    pub fn single_rotation() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        forest.insert(&mut tree, 1, "1".to_string()).unwrap();
        forest.insert(&mut tree, 2, "2".to_string()).unwrap();
        // promote 2, then 1 is 2,0 with a 2,1 child: rotate and demote
        assert_eq!(forest.insert(&mut tree, 3, "3".to_string()), Ok(3));

        assert_eq!(forest.root_key(&tree), Some(2));
        assert_eq!(forest.rank(&tree), 1);
        assert_eq!(forest.size(&tree), 3);
        forest.validate(&tree).unwrap();
    }

    #[test]
    pub fn double_rotation() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        forest.insert(&mut tree, 3, "3".to_string()).unwrap();
        forest.insert(&mut tree, 1, "1".to_string()).unwrap();
        // promote 1, then 3 is 0,2 with a 2,1 child
        assert_eq!(forest.insert(&mut tree, 2, "2".to_string()), Ok(6));

        assert_eq!(forest.root_key(&tree), Some(2));
        assert_eq!(forest.keys_in_order(&tree), vec![1, 2, 3]);
        forest.validate(&tree).unwrap();
    }

    #[test]
    pub fn duplicate_leaves_tree_untouched() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        for key in [5, 3, 8, 1, 4] {
            forest.insert(&mut tree, key, key.to_string()).unwrap();
        }
        let keys = forest.keys_in_order(&tree);

        assert_eq!(
            forest.insert(&mut tree, 4, "other".to_string()),
            Err(AvlError::DuplicateKey(4))
        );
        assert_eq!(forest.keys_in_order(&tree), keys);
        assert_eq!(forest.size(&tree), 5);
        assert_eq!(forest.search(&tree, 4), Some("4"));
        forest.validate(&tree).unwrap();
    }

    #[test]
    pub fn extremes_follow_insertions() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        for key in [10, 20, 5, 15, -1, 30] {
            forest.insert(&mut tree, key, key.to_string()).unwrap();
        }

        assert_eq!(forest.min_key(&tree), Some(-1));
        assert_eq!(forest.max_key(&tree), Some(30));
        assert_eq!(forest.min(&tree), Some("-1"));
    }

    #[test]
    pub fn ascending_run_stays_logarithmic() {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        for key in 0..1023 {
            forest.insert(&mut tree, key, key.to_string()).unwrap();
        }

        assert_eq!(forest.size(&tree), 1023);
        assert!(forest.rank(&tree) <= 13);
        forest.validate(&tree).unwrap();
    }
}
