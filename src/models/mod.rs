//! Data model for the cash card API
//!
//! The cash card entity, its monetary amount type, and the DTOs used for
//! request and response bodies.

pub mod card;
pub mod money;
pub mod responses;

// Re-export commonly used types
pub use card::{CashCard, NewCashCard, CASHCARDS_PATH};
pub use money::Amount;
pub use responses::HealthResponse;
