//! Cash card entity and the create payload

use serde::{Deserialize, Serialize};

use super::money::Amount;

/// Path prefix under which cash cards are served
pub const CASHCARDS_PATH: &str = "/cashcards";

// == Cash Card ==
/// A cash card: an id and its monetary balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCard {
    /// Unique identifier within the store
    pub id: u64,
    /// Current balance
    pub amount: Amount,
}

impl CashCard {
    /// Creates a new CashCard
    pub fn new(id: u64, amount: Amount) -> Self {
        Self { id, amount }
    }

    /// Location of this card, e.g. `/cashcards/42`
    pub fn location(&self) -> String {
        format!("{}/{}", CASHCARDS_PATH, self.id)
    }
}

// == New Cash Card ==
/// Request body for `POST /cashcards`.
///
/// The id may be left out, in which case the store assigns one.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCashCard {
    /// Caller-chosen id
    #[serde(default)]
    pub id: Option<u64>,
    /// Opening balance
    pub amount: Amount,
}

impl NewCashCard {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.id == Some(0) {
            return Some("Card id must be a positive integer".to_string());
        }
        None
    }
}
