//! API Module
//!
//! HTTP handlers and routing for the cash card REST API.
//!
//! # Endpoints
//! - `GET /cashcards/:id` - Fetch one card (CARD-OWNER)
//! - `GET /cashcards` - List all cards (CARD-OWNER)
//! - `POST /cashcards` - Create a card (CARD-OWNER)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, route_table, RouteEntry, ROUTES};
