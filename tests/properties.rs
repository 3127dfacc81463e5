use counted_multiset::Multiset;
use proptest::prelude::*;

fn multiset() -> impl Strategy<Value = Multiset<u8>> {
    proptest::collection::vec((0u8..16, 1usize..6), 0..24)
        .prop_map(|entries| entries.into_iter().collect::<Multiset<u8>>())
}

proptest! {
    #[test]
    fn insert_returns_prior_count(values in proptest::collection::vec(0u8..8, 0..64)) {
        let mut set = Multiset::new();
        let mut counts = [0usize; 8];

        for value in values {
            prop_assert_eq!(set.insert(value), counts[value as usize]);
            counts[value as usize] += 1;
        }

        for value in 0..8u8 {
            prop_assert_eq!(set.contains(&value), counts[value as usize]);
        }
    }

    #[test]
    fn len_matches_traversal(set in multiset()) {
        let total: usize = set.iter().map(|(_, count)| count).sum();

        prop_assert_eq!(set.len(), total);
        prop_assert_eq!(set.cardinality(), set.iter().count());
        prop_assert!(set.iter().all(|(_, count)| count > 0));
    }

    #[test]
    fn remove_then_insert_restores_count(mut set in multiset(), value in 0u8..16) {
        let before = set.clone();

        if set.remove(&value) > 0 {
            set.insert(value);
        }

        prop_assert_eq!(set, before);
    }

    #[test]
    fn equality_is_reflexive_and_symmetric(a in multiset(), b in multiset()) {
        prop_assert_eq!(&a, &a.clone());
        prop_assert_eq!(a == b, b == a);
    }

    #[test]
    fn union_and_intersection_are_idempotent(a in multiset()) {
        prop_assert_eq!(a.union(&a), a.clone());
        prop_assert_eq!(a.intersection(&a), a.clone());
        prop_assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn union_sum_and_intersection_commute(a in multiset(), b in multiset()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.sum(&b), b.sum(&a));
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn algebra_matches_pointwise_definition(a in multiset(), b in multiset()) {
        let union = a.union(&b);
        let intersection = a.intersection(&b);
        let sum = a.sum(&b);
        let difference = a.difference(&b);

        for value in 0..16u8 {
            let (x, y) = (a.contains(&value), b.contains(&value));

            prop_assert_eq!(union.contains(&value), x.max(y));
            prop_assert_eq!(intersection.contains(&value), x.min(y));
            prop_assert_eq!(sum.contains(&value), x + y);
            prop_assert_eq!(difference.contains(&value), x.saturating_sub(y));
        }

        prop_assert_eq!(sum.len(), a.len() + b.len());
        prop_assert!(difference.iter().all(|(_, count)| count > 0));
        prop_assert!(intersection.is_subset(&a) && intersection.is_subset(&b));
        prop_assert!(a.is_subset(&union) && b.is_subset(&union));
    }

    #[test]
    fn display_is_independent_of_insertion_order(entries in proptest::collection::vec((0u8..16, 1usize..6), 0..24)) {
        let forward: Multiset<u8> = entries.iter().copied().collect();
        let backward: Multiset<u8> = entries.iter().rev().copied().collect();

        prop_assert_eq!(forward.to_string(), backward.to_string());
    }
}
