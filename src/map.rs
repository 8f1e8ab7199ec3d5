use alloc::string::String;
use alloc::vec::Vec;

use crate::{AvlError, AvlForest, AvlInorderIterator, AvlTree};

/// An ordered map from `i64` keys to `String` values.
///
/// Owns a private forest holding a single tree. Use [`AvlMap::into_parts`] to
/// split or join it.
#[derive(Debug, Default)]
pub struct AvlMap {
    forest: AvlForest,
    tree: AvlTree,
}

impl AvlMap {
    #[must_use]
    pub fn new() -> Self {
        Self {
            forest: AvlForest::new(),
            tree: AvlTree::new(),
        }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forest: AvlForest::with_capacity(capacity),
            tree: AvlTree::new(),
        }
    }

    /// Rebuilds a map from a forest and a tree of that forest. Other trees
    /// the forest may hold stay allocated but unreachable.
    #[must_use]
    pub fn from_parts(forest: AvlForest, tree: AvlTree) -> Self {
        Self { forest, tree }
    }

    #[must_use]
    pub fn into_parts(self) -> (AvlForest, AvlTree) {
        (self.forest, self.tree)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.forest.reserve(additional);
    }

    #[must_use]
    pub fn search(&self, key: i64) -> Option<&str> {
        self.forest.search(&self.tree, key)
    }

    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.forest.contains(&self.tree, key)
    }

    /// See [`AvlForest::insert`].
    pub fn insert(&mut self, key: i64, value: String) -> Result<usize, AvlError> {
        self.forest.insert(&mut self.tree, key, value)
    }

    /// See [`AvlForest::delete`].
    pub fn delete(&mut self, key: i64) -> Result<usize, AvlError> {
        self.forest.delete(&mut self.tree, key)
    }

    #[must_use]
    pub fn min(&self) -> Option<&str> {
        self.forest.min(&self.tree)
    }

    #[must_use]
    pub fn max(&self) -> Option<&str> {
        self.forest.max(&self.tree)
    }

    #[must_use]
    pub fn min_key(&self) -> Option<i64> {
        self.forest.min_key(&self.tree)
    }

    #[must_use]
    pub fn max_key(&self) -> Option<i64> {
        self.forest.max_key(&self.tree)
    }

    #[must_use]
    pub fn root_key(&self) -> Option<i64> {
        self.forest.root_key(&self.tree)
    }

    #[must_use]
    pub fn rank(&self) -> i32 {
        self.forest.rank(&self.tree)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forest.size(&self.tree)
    }

    #[must_use]
    pub fn keys_in_order(&self) -> Vec<i64> {
        self.forest.keys_in_order(&self.tree)
    }

    #[must_use]
    pub fn values_in_order(&self) -> Vec<String> {
        self.forest.values_in_order(&self.tree)
    }

    #[must_use]
    pub fn iter(&self) -> AvlInorderIterator<'_> {
        self.forest.iter(&self.tree)
    }
}

impl<'a> IntoIterator for &'a AvlMap {
    type Item = (i64, &'a str);
    type IntoIter = AvlInorderIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
