use linked_bst::SearchTree;

use std::collections::{HashMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a hashmap.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in the map.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut SearchTree<K, V>, map: &mut HashMap<K, V>)
where
    K: std::hash::Hash + Eq + Clone + Ord,
    V: std::fmt::Debug + PartialEq + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k, v) => {
                if bst.set(k, v.clone()).is_err() {
                    bst.add(k.clone(), v.clone());
                }
                map.insert(k.clone(), v.clone());
            }
            Op::Remove(k) => {
                assert_eq!(bst.remove(k), map.remove(k));
            }
        }
    }
}

/// Whether in-order traversal yields keys in non-decreasing order.
fn is_sorted<V>(tree: &SearchTree<i8, V>) -> bool {
    let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    keys.windows(2).all(|w| w[0] <= w[1])
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
        let mut tree = SearchTree::new();
        let mut map = HashMap::new();

        do_ops(&ops, &mut tree, &mut map);
        tree.len() == map.len()
            && is_sorted(&tree)
            && map.keys().all(|key| tree.get(key) == map.get(key))
    }

    fn contains(xs: Vec<i8>) -> bool {
        let mut tree = SearchTree::new();
        for x in &xs {
            tree.add(*x, *x);
        }

        xs.iter().all(|x| tree.contains(x) && tree.get(x) == Some(x))
    }

    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let mut tree = SearchTree::new();
        for x in &xs {
            tree.add(*x, *x);
        }
        let added: HashSet<_> = xs.into_iter().collect();
        let nots: HashSet<_> = nots.into_iter().collect();
        let mut nots = nots.difference(&added);

        nots.all(|x| tree.get(x).is_none())
    }

    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree = SearchTree::new();
        for x in &xs {
            tree.add(*x, *x);
        }

        let mut still_present = xs;
        for delete in &deletes {
            // Duplicate adds make duplicate nodes - each remove takes out one of them.
            let removed = tree.remove(delete);
            match still_present.iter().position(|x| x == delete) {
                Some(pos) => {
                    still_present.swap_remove(pos);
                    if removed != Some(*delete) {
                        return false;
                    }
                }
                None => {
                    if removed.is_some() {
                        return false;
                    }
                }
            }
        }

        tree.len() == still_present.len()
            && is_sorted(&tree)
            && still_present.iter().all(|x| tree.contains(x))
            && deletes
                .iter()
                .filter(|x| !still_present.contains(x))
                .all(|x| tree.get(x).is_none())
    }
}
