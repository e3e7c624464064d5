use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::dict::AvlDict;

#[derive(Clone, Debug)]
enum Op {
    Insert(i64, i64),
    Delete(i64),
    Get(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..32_i64, any::<i64>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..32_i64).prop_map(Op::Delete),
        1 => (0..32_i64).prop_map(Op::Get),
    ]
}

fn flatten(refs: &BTreeMap<i64, Vec<i64>>) -> Vec<(i64, i64)> {
    refs.iter()
        .flat_map(|(k, vals)| vals.iter().map(move |v| (*k, *v)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_matches_multimap(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("prop");
        let mut refs: BTreeMap<i64, Vec<i64>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert!(dict.insert(k, v).is_some());
                    refs.entry(k).or_default().push(v);
                }
                Op::Delete(k) => {
                    let refval = refs.get_mut(&k).and_then(|vals| vals.pop());
                    if refs.get(&k).map_or(false, |vals| vals.is_empty()) {
                        refs.remove(&k);
                    }
                    prop_assert_eq!(dict.delete(&k), refval);
                }
                Op::Get(k) => {
                    let refval = refs.get(&k).and_then(|vals| vals.first());
                    prop_assert_eq!(dict.get(&k), refval);
                    prop_assert_eq!(dict.count(&k), refs.get(&k).map_or(0, |vals| vals.len()));
                }
            }
            let res = dict.validate();
            prop_assert!(res.is_ok(), "{:?}", res.err());
        }

        let items: Vec<(i64, i64)> = dict.iter().map(|(k, v)| (*k, *v)).collect();
        let refitems = flatten(&refs);
        prop_assert_eq!(dict.len(), refitems.len());
        prop_assert_eq!(dict.is_empty(), refitems.is_empty());
        prop_assert_eq!(items, refitems);
    }

    #[test]
    fn prop_range_matches(
        keys in prop::collection::vec(0..64_i64, 0..100),
        low in 0..64_i64,
        high in 0..64_i64,
    ) {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("prop");
        let mut refs: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
        for (value, key) in keys.into_iter().enumerate() {
            dict.insert(key, value as i64);
            refs.entry(key).or_default().push(value as i64);
        }

        let items: Vec<(i64, i64)> = dict.range(low..=high).map(|(k, v)| (*k, *v)).collect();
        let refitems: Vec<(i64, i64)> = if low <= high {
            let sub: BTreeMap<i64, Vec<i64>> =
                refs.range(low..=high).map(|(k, v)| (*k, v.clone())).collect();
            flatten(&sub)
        } else {
            vec![]
        };
        prop_assert_eq!(&items, &refitems);

        let mut items: Vec<(i64, i64)> = dict.range(low..=high).rev().map(|(k, v)| (*k, *v)).collect();
        items.reverse();
        prop_assert_eq!(items, refitems);
    }

    #[test]
    fn prop_delete_any_order(
        (keys, order) in prop::collection::vec(0..16_i64, 1..64)
            .prop_flat_map(|keys| (Just(keys.clone()), Just(keys).prop_shuffle()))
    ) {
        let mut dict: AvlDict<i64, i64> = AvlDict::new("prop");
        for (value, key) in keys.iter().enumerate() {
            dict.insert(*key, value as i64);
        }
        for (i, key) in order.iter().enumerate() {
            prop_assert!(dict.delete(key).is_some());
            prop_assert_eq!(dict.len(), keys.len() - i - 1);
            prop_assert!(dict.validate().is_ok());
        }
        prop_assert!(dict.is_empty());
    }
}
