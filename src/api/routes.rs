//! API Routes
//!
//! Configures the Axum router with the cash card endpoints and the access
//! gate in front of them.

use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_card_handler, get_card_handler, health_handler, list_cards_handler, AppState,
};
use crate::auth::{access_gate, csrf_guard, AccessPolicy};

/// Every endpoint as `(method, path pattern)`, in the order it is mounted.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/cashcards/:id"),
    ("GET", "/cashcards"),
    ("POST", "/cashcards"),
    ("GET", "/health"),
];

/// A mounted endpoint together with the role the access policy demands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub method: &'static str,
    pub path: &'static str,
    pub required_role: Option<String>,
}

/// Resolves each entry of [`ROUTES`] against `policy`.
pub fn route_table(policy: &AccessPolicy) -> Vec<RouteEntry> {
    ROUTES
        .iter()
        .map(|&(method, path)| RouteEntry {
            method,
            path,
            required_role: policy.required_role(path).map(str::to_owned),
        })
        .collect()
}

/// Creates the main router with all endpoints configured.
///
/// # Middleware (outermost first)
/// - Tracing: Logs all requests
/// - CSRF guard: only when enabled in `AppState`
/// - Access gate: enforces the access policy on every path, including
///   unmatched methods and the fallback
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/cashcards/:id", get(get_card_handler))
        .route(
            "/cashcards",
            get(list_cards_handler).post(create_card_handler),
        )
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            access_gate,
        ));

    let router = if state.csrf_protection {
        router.layer(middleware::from_fn(csrf_guard))
    } else {
        router
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
