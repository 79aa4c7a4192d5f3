//! In-Memory Card Store
//!
//! BTreeMap keyed by card id behind a single RwLock.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use super::CardRepository;
use crate::error::{ApiError, Result};
use crate::models::{CashCard, NewCashCard};

// == In-Memory Card Store ==
/// Card store that lives for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryCardStore {
    cards: RwLock<BTreeMap<u64, CashCard>>,
}

impl InMemoryCardStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given cards.
    ///
    /// Later cards replace earlier ones with the same id.
    pub fn with_cards(cards: impl IntoIterator<Item = CashCard>) -> Self {
        let cards = cards.into_iter().map(|card| (card.id, card)).collect();
        Self {
            cards: RwLock::new(cards),
        }
    }
}

impl CardRepository for InMemoryCardStore {
    fn get(&self, id: u64) -> Option<CashCard> {
        self.cards.read().get(&id).copied()
    }

    fn list(&self) -> Vec<CashCard> {
        self.cards.read().values().copied().collect()
    }

    // == Put ==
    /// Id lookup, allocation and insert all happen under one write lock.
    fn put(&self, card: NewCashCard) -> Result<CashCard> {
        let mut cards = self.cards.write();

        let id = match card.id {
            Some(id) => {
                if let Some(existing) = cards.get(&id) {
                    if existing.amount == card.amount {
                        debug!(id, "replayed create of existing card");
                        return Ok(*existing);
                    }
                    return Err(ApiError::Conflict(id));
                }
                id
            }
            None => match cards.keys().next_back() {
                Some(&max) => max
                    .checked_add(1)
                    .ok_or_else(|| ApiError::Internal("card id space exhausted".to_string()))?,
                None => 1,
            },
        };

        let stored = CashCard::new(id, card.amount);
        cards.insert(id, stored);
        debug!(id, amount = %stored.amount, "stored card");

        Ok(stored)
    }

    fn len(&self) -> usize {
        self.cards.read().len()
    }
}
