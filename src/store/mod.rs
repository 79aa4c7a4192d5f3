//! Card Store Module
//!
//! The keyed store behind the cash card handlers. Handlers only see the
//! [`CardRepository`] trait; the process wires in a concrete store at startup.

mod memory;

#[cfg(test)]
mod property_tests;

pub use memory::InMemoryCardStore;

use crate::error::Result;
use crate::models::{CashCard, NewCashCard};

// == Card Repository ==
/// Keyed storage for cash cards.
///
/// Implementations must make `put` atomic per id: two concurrent creates
/// never overwrite each other.
pub trait CardRepository: Send + Sync {
    /// Looks up a card by id.
    fn get(&self, id: u64) -> Option<CashCard>;

    /// Returns every card, ordered by id.
    fn list(&self) -> Vec<CashCard>;

    /// Stores a new card and returns it as persisted.
    ///
    /// Assigns an id when the request carries none. Replaying a create with
    /// an existing id and the same amount returns the stored card; a
    /// different amount fails with `Conflict`.
    fn put(&self, card: NewCashCard) -> Result<CashCard>;

    /// Number of cards held.
    fn len(&self) -> usize;

    /// Returns true if the store holds no cards.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
