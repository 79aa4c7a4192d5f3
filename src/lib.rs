//! Cash Card API - A small REST service over cash cards
//!
//! Create and read cash cards behind an HTTP Basic, role-gated access gate.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use config::Config;
