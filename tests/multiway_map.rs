use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sabi_tree::{Error, MultiwayMap};

/// The number of operations in each randomized test case.
const TEST_SIZE: usize = 2_048;

fn key_strategy() -> impl Strategy<Value = i64> {
    -1_024i64..1_024
}

#[derive(Clone, Debug)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
    ]
}

#[test]
fn order_below_two_is_rejected_at_construction() {
    assert_eq!(MultiwayMap::<i32, ()>::new(0).unwrap_err(), Error::InvalidOrder(0));
    assert_eq!(MultiwayMap::<i32, ()>::new(1).unwrap_err(), Error::InvalidOrder(1));
    assert_eq!(MultiwayMap::<i32, ()>::with_capacity(1, 64).unwrap_err(), Error::InvalidOrder(1));
    assert_eq!(MultiwayMap::<i32, ()>::new(2).unwrap().order(), 2);
}

#[test]
fn default_uses_the_minimum_order() {
    let map: MultiwayMap<i32, ()> = MultiwayMap::default();
    assert_eq!(map.order(), MultiwayMap::<i32, ()>::DEFAULT_ORDER);
    assert!(map.is_empty());
}

#[test]
fn duplicate_insert_overwrites_the_value() {
    let mut map = MultiwayMap::new(2).unwrap();
    assert_eq!(map.insert(1, "one"), None);
    assert_eq!(map.insert(1, "uno"), Some("one"));
    assert_eq!(map.len(), 1);
    assert_eq!(map[&1], "uno");
}

#[test]
fn splitting_preserves_every_entry() {
    // Order 2 splits after the fourth insert; all four keys stay reachable.
    let mut map = MultiwayMap::new(2).unwrap();
    for key in 1..=4 {
        map.insert(key, key * 10);
    }
    for key in 1..=4 {
        assert_eq!(map.get(&key), Some(&(key * 10)));
    }
    assert_eq!(map.len(), 4);
}

#[test]
fn removal_of_an_absent_key_is_a_hard_error() {
    let mut map: MultiwayMap<i32, ()> = MultiwayMap::new(2).unwrap();
    assert_eq!(map.remove(&1), Err(Error::KeyNotFound));

    map.insert(1, ());
    assert_eq!(map.remove(&2), Err(Error::KeyNotFound));
    assert_eq!(map.len(), 1);
}

#[test]
fn removal_after_a_split_keeps_the_rest() {
    let mut map = MultiwayMap::new(2).unwrap();
    for key in 1..=4 {
        map.insert(key, ());
    }
    assert_eq!(map.remove(&1), Ok((1, ())));
    assert_eq!(map.get(&1), None);
    for key in 2..=4 {
        assert!(map.contains_key(&key), "key {key} lost");
    }
}

#[test]
fn draining_a_tall_tree_key_by_key() {
    let mut map = MultiwayMap::new(2).unwrap();
    for key in 0..256 {
        map.insert(key, key);
    }
    // Removing in insertion order exercises borrows, merges and repeated
    // root shrinks on the way back down to empty.
    for key in 0..256 {
        assert_eq!(map.remove(&key), Ok((key, key)));
    }
    assert!(map.is_empty());
    assert_eq!(map.first_key_value(), None);
}

#[test]
fn iterators_are_double_ended_and_sized() {
    let mut map = MultiwayMap::new(3).unwrap();
    for key in [5, 1, 4, 2, 3] {
        map.insert(key, key * 2);
    }

    let mut iter = map.iter();
    assert_eq!(iter.len(), 5);
    assert_eq!(iter.next(), Some((&1, &2)));
    assert_eq!(iter.next_back(), Some((&5, &10)));
    assert_eq!(iter.next(), Some((&2, &4)));
    assert_eq!(iter.next_back(), Some((&4, &8)));
    assert_eq!(iter.next(), Some((&3, &6)));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, [1, 2, 3, 4, 5]);

    let owned: Vec<_> = map.clone().into_iter().collect();
    assert_eq!(owned, [(1, 2), (2, 4), (3, 6), (4, 8), (5, 10)]);
}

#[test]
fn first_and_last_track_the_extremes() {
    let mut map = MultiwayMap::new(2).unwrap();
    assert_eq!(map.first_key_value(), None);
    for key in [10, 30, 20, 5, 25] {
        map.insert(key, ());
    }
    assert_eq!(map.first_key_value(), Some((&5, &())));
    assert_eq!(map.last_key_value(), Some((&30, &())));
    map.remove(&5).unwrap();
    map.remove(&30).unwrap();
    assert_eq!(map.first_key_value(), Some((&10, &())));
    assert_eq!(map.last_key_value(), Some((&25, &())));
}

#[test]
fn extend_overwrites_like_insert() {
    let mut map = MultiwayMap::new(2).unwrap();
    map.extend([(1, "a"), (2, "b"), (1, "c")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&1], "c");
}

#[test]
fn equality_ignores_the_branching_order() {
    let mut a = MultiwayMap::new(2).unwrap();
    let mut b = MultiwayMap::new(5).unwrap();
    for key in 0..32 {
        a.insert(key, key);
        b.insert(31 - key, 31 - key);
    }
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Replays a random op sequence against a `BTreeMap` model across
    /// several branching orders. The overwrite-on-duplicate contract makes
    /// the model exactly `BTreeMap::insert`.
    #[test]
    fn ops_match_btreemap(
        order in 2usize..6,
        ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE),
    ) {
        let mut map: MultiwayMap<i64, i64> = MultiwayMap::new(order).unwrap();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(map.insert(*k, *v), model.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    let expected = model.remove(k).map(|v| (*k, v)).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(map.remove(k), expected, "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(k), model.get(k), "get({})", k);
                }
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.is_empty(), model.is_empty());
        }

        let items: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(items, expected);

        prop_assert_eq!(map.first_key_value(), model.first_key_value());
        prop_assert_eq!(map.last_key_value(), model.last_key_value());
    }

    /// Every inserted key reads back its last written value.
    #[test]
    fn round_trip_returns_the_last_written_value(
        order in 2usize..6,
        entries in proptest::collection::vec((key_strategy(), any::<i64>()), 1..TEST_SIZE),
    ) {
        let mut map: MultiwayMap<i64, i64> = MultiwayMap::new(order).unwrap();
        let mut last: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            map.insert(*k, *v);
            last.insert(*k, *v);
        }
        for (k, v) in &last {
            prop_assert_eq!(map.get(k), Some(v));
        }
    }
}
