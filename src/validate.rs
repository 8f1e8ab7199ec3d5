use alloc::vec::Vec;

use thiserror::Error;

use crate::{AvlForest, AvlTree, NodeIndex};

/// A broken structural invariant, naming the key of the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("key {0} is out of search-tree order")]
    Order(i64),

    #[error("children of key {0} differ in rank by more than one")]
    Unbalanced(i64),

    #[error("rank of key {0} is not one above its taller child")]
    Rank(i64),

    #[error("size of key {0} does not count its subtree")]
    Size(i64),

    #[error("parent link below key {0} does not point back")]
    ParentLink(i64),

    #[error("the root has a parent")]
    RootParent,

    #[error("cached minimum is stale")]
    MinCache,

    #[error("cached maximum is stale")]
    MaxCache,
}

impl AvlForest {
    /// Audits every invariant of `tree` in `O(n)`: search order, rank balance,
    /// rank and size bookkeeping, parent links and the cached extremes.
    pub fn validate(&self, tree: &AvlTree) -> Result<(), InvariantViolation> {
        if tree.root != Self::NIL && self.node(tree.root).parent != Self::NIL {
            return Err(InvariantViolation::RootParent);
        }

        let mut previous: Option<i64> = None;
        let mut stack: Vec<NodeIndex> = Vec::new();
        let mut curr = tree.root;

        while curr != Self::NIL || !stack.is_empty() {
            while curr != Self::NIL {
                stack.push(curr);
                curr = self.node(curr).left;
            }

            let Some(idx) = stack.pop() else { break };
            self.validate_node(idx)?;

            let key = self.node(idx).key;
            if previous.is_some_and(|prev| prev >= key) {
                return Err(InvariantViolation::Order(key));
            }
            previous = Some(key);
            curr = self.node(idx).right;
        }

        if tree.min != self.leftmost(tree.root) {
            return Err(InvariantViolation::MinCache);
        }
        if tree.max != self.rightmost(tree.root) {
            return Err(InvariantViolation::MaxCache);
        }

        Ok(())
    }

    fn validate_node(&self, idx: NodeIndex) -> Result<(), InvariantViolation> {
        let node = self.node(idx);
        let (left_rank, right_rank) = (self.rank_of(node.left), self.rank_of(node.right));

        if (left_rank - right_rank).abs() > 1 {
            return Err(InvariantViolation::Unbalanced(node.key));
        }
        if node.rank != left_rank.max(right_rank) + 1 {
            return Err(InvariantViolation::Rank(node.key));
        }
        if node.size != self.size_of(node.left) + self.size_of(node.right) + 1 {
            return Err(InvariantViolation::Size(node.key));
        }
        for child in [node.left, node.right] {
            if child != Self::NIL && self.node(child).parent != idx {
                return Err(InvariantViolation::ParentLink(node.key));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::InvariantViolation;
    use crate::{AvlForest, AvlTree};

    fn forest_with(keys: &[i64]) -> (AvlForest, AvlTree) {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();

        for &key in keys {
            forest.insert(&mut tree, key, key.to_string()).unwrap();
        }

        (forest, tree)
    }

    #[test]
    pub fn valid_tree_passes() {
        let (forest, tree) = forest_with(&[5, 3, 8, 1, 4, 7, 9]);

        assert_eq!(forest.validate(&tree), Ok(()));
        assert_eq!(forest.validate(&AvlTree::new()), Ok(()));
    }

    #[test]
    pub fn detects_corrupted_bookkeeping() {
        let (mut forest, tree) = forest_with(&[5, 3, 8]);
        let three = forest.node(tree.root).left;

        forest.node_mut(three).size = 4;
        assert_eq!(forest.validate(&tree), Err(InvariantViolation::Size(3)));

        forest.node_mut(three).size = 1;
        forest.node_mut(three).rank = 2;
        assert_eq!(forest.validate(&tree), Err(InvariantViolation::Rank(3)));

        forest.node_mut(three).rank = 0;
        forest.node_mut(three).key = 6;
        assert_eq!(forest.validate(&tree), Err(InvariantViolation::Order(5)));
    }

    #[test]
    pub fn detects_rank_imbalance() {
        let (mut forest, tree) = forest_with(&[5, 3, 8, 7, 9]);
        let root = tree.root;

        // drop the leaf on the left, the right child keeps rank 1
        forest.node_mut(root).left = AvlForest::NIL;
        assert_eq!(forest.validate(&tree), Err(InvariantViolation::Unbalanced(5)));
    }

    #[test]
    pub fn detects_stale_extremes() {
        let (forest, mut tree) = forest_with(&[5, 3, 8]);

        tree.min = tree.root;
        assert_eq!(forest.validate(&tree), Err(InvariantViolation::MinCache));
    }
}
