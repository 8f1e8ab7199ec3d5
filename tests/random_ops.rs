use std::collections::BTreeMap;

use avlwood::{AvlError, AvlForest, AvlTree};
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

// Small enough that inserts and deletes collide often
fn key_strategy() -> impl Strategy<Value = i64> {
    -300i64..300i64
}

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Delete(i64),
    Search(i64),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        4 => key_strategy().prop_map(TreeOp::Insert),
        3 => key_strategy().prop_map(TreeOp::Delete),
        1 => key_strategy().prop_map(TreeOp::Search),
    ]
}

fn grow(forest: &mut AvlForest, keys: &[i64]) -> AvlTree {
    let mut tree = AvlTree::new();

    for &key in keys {
        // duplicates in the generated keys are simply rejected
        let _ = forest.insert(&mut tree, key, key.to_string());
    }

    tree
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays random insert/delete/search sequences on both the tree and a
    /// BTreeMap, auditing every invariant after each mutation.
    #[test]
    fn ops_match_btreemap(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut forest = AvlForest::new();
        let mut tree = AvlTree::new();
        let mut model: BTreeMap<i64, String> = BTreeMap::new();

        for op in &ops {
            match *op {
                TreeOp::Insert(k) => {
                    let result = forest.insert(&mut tree, k, format!("#{k}"));
                    if model.contains_key(&k) {
                        prop_assert_eq!(result, Err(AvlError::DuplicateKey(k)));
                    } else {
                        prop_assert!(result.is_ok(), "insert({})", k);
                        model.insert(k, format!("#{k}"));
                    }
                }
                TreeOp::Delete(k) => {
                    let result = forest.delete(&mut tree, k);
                    if model.remove(&k).is_some() {
                        prop_assert!(result.is_ok(), "delete({})", k);
                    } else {
                        prop_assert_eq!(result, Err(AvlError::KeyNotFound(k)));
                    }
                }
                TreeOp::Search(k) => {
                    prop_assert_eq!(forest.search(&tree, k), model.get(&k).map(String::as_str));
                }
            }

            prop_assert_eq!(forest.validate(&tree), Ok(()));
            prop_assert_eq!(forest.size(&tree), model.len());
            prop_assert_eq!(forest.min_key(&tree), model.keys().next().copied());
            prop_assert_eq!(forest.max_key(&tree), model.keys().next_back().copied());
        }

        let keys: Vec<i64> = model.keys().copied().collect();
        prop_assert_eq!(forest.keys_in_order(&tree), keys);
        let values: Vec<String> = model.values().cloned().collect();
        prop_assert_eq!(forest.values_in_order(&tree), values);
    }

    /// Splitting at a present key partitions the rest of the keys, and joining
    /// the halves back around it restores the original sequence.
    #[test]
    fn split_partitions_and_join_restores(
        keys in proptest::collection::vec(key_strategy(), 1..400),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut forest = AvlForest::new();
        let mut tree = grow(&mut forest, &keys);
        let before = forest.keys_in_order(&tree);
        let pivot = before[pick.index(before.len())];

        let (mut smaller, mut larger) = forest.split(&mut tree, pivot).unwrap();
        prop_assert!(tree.is_empty());
        prop_assert_eq!(forest.validate(&smaller), Ok(()));
        prop_assert_eq!(forest.validate(&larger), Ok(()));

        let below: Vec<i64> = before.iter().copied().filter(|&k| k < pivot).collect();
        let above: Vec<i64> = before.iter().copied().filter(|&k| k > pivot).collect();
        prop_assert_eq!(forest.keys_in_order(&smaller), below);
        prop_assert_eq!(forest.keys_in_order(&larger), above);

        let expected_cost = (forest.rank(&smaller) - forest.rank(&larger)).unsigned_abs() as usize + 1;
        let cost = forest.join(&mut larger, pivot, pivot.to_string(), &mut smaller).unwrap();
        prop_assert_eq!(cost, expected_cost);
        prop_assert!(smaller.is_empty());
        prop_assert_eq!(forest.validate(&larger), Ok(()));
        prop_assert_eq!(forest.keys_in_order(&larger), before);
    }

    /// Joining two independently built trees yields the sorted union.
    #[test]
    fn join_yields_sorted_union(
        low_keys in proptest::collection::vec(-1_000i64..0, 0..300),
        high_keys in proptest::collection::vec(1i64..1_000, 0..30),
    ) {
        let mut forest = AvlForest::new();
        let mut low = grow(&mut forest, &low_keys);
        let mut high = grow(&mut forest, &high_keys);

        let mut expected = forest.keys_in_order(&low);
        expected.push(0);
        expected.extend(forest.keys_in_order(&high));

        forest.join(&mut low, 0, "pivot".to_string(), &mut high).unwrap();

        prop_assert_eq!(forest.validate(&low), Ok(()));
        prop_assert_eq!(forest.keys_in_order(&low), expected);
        prop_assert_eq!(forest.size(&low), forest.node_count());
    }
}
