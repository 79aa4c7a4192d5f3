//! Property-Based Tests for the Card Store
//!
//! Uses proptest to check lookup, read-back and listing behaviour over
//! arbitrary sequences of creates.

use proptest::prelude::*;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{Amount, NewCashCard};
use crate::store::{CardRepository, InMemoryCardStore};

// == Strategies ==
/// Generates create requests with small ids so collisions actually happen
fn new_card_strategy() -> impl Strategy<Value = NewCashCard> {
    (prop::option::of(1u64..32), 0u64..1_000_000).prop_map(|(id, cents)| NewCashCard {
        id,
        amount: Amount::from_cents(cents),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Ids that were never stored are never found.
    #[test]
    fn prop_unknown_ids_not_found(
        ids in prop::collection::btree_set(1u64..1000, 0..20),
        missing_id in 1000u64..u64::MAX,
    ) {
        let store = InMemoryCardStore::new();
        for id in &ids {
            store.put(NewCashCard { id: Some(*id), amount: Amount::from_cents(1) }).unwrap();
        }

        prop_assert!(store.get(missing_id).is_none());
    }

    // Every successful create reads back with the identical amount.
    #[test]
    fn prop_created_cards_read_back(reqs in prop::collection::vec(new_card_strategy(), 1..50)) {
        let store = InMemoryCardStore::new();

        for req in reqs {
            match store.put(req.clone()) {
                Ok(card) => {
                    let fetched = store.get(card.id);
                    prop_assert_eq!(fetched.map(|c| c.amount), Some(req.amount));
                    if let Some(id) = req.id {
                        prop_assert_eq!(card.id, id);
                    }
                }
                Err(ApiError::Conflict(id)) => {
                    prop_assert_eq!(Some(id), req.id);
                    prop_assert!(store.get(id).map(|c| c.amount) != Some(req.amount));
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }
    }

    // Listing returns exactly the stored cards, ordered by id.
    #[test]
    fn prop_list_matches_model(reqs in prop::collection::vec(new_card_strategy(), 0..50)) {
        let store = InMemoryCardStore::new();
        let mut model = BTreeMap::new();

        for req in reqs {
            if let Ok(card) = store.put(req) {
                model.insert(card.id, card);
            }
        }

        let listed = store.list();
        let expected: Vec<_> = model.into_values().collect();
        prop_assert_eq!(listed, expected);
        prop_assert_eq!(store.len(), store.list().len());
    }
}
