//! API Handlers
//!
//! HTTP request handlers for the cash card endpoints.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;

use crate::auth::{AccessGate, AccessPolicy, AuthenticatedPrincipal};
use crate::config::{Config, ConfigError};
use crate::error::{ApiError, Result};
use crate::models::{CashCard, HealthResponse, NewCashCard};
use crate::store::{CardRepository, InMemoryCardStore};

/// Application state shared across all handlers.
///
/// Built once at process start; handlers and middleware only see what is
/// passed in here.
#[derive(Clone)]
pub struct AppState {
    /// Card store
    pub cards: Arc<dyn CardRepository>,
    /// Access gate guarding `/cashcards/**`
    pub gate: Arc<AccessGate>,
    /// Whether the CSRF guard is installed on the listener
    pub csrf_protection: bool,
}

impl AppState {
    /// Creates a new AppState with the given store and gate, CSRF guard off.
    pub fn new(cards: Arc<dyn CardRepository>, gate: AccessGate) -> Self {
        Self {
            cards,
            gate: Arc::new(gate),
            csrf_protection: false,
        }
    }

    /// Turns the CSRF guard on or off.
    pub fn with_csrf_protection(mut self, enabled: bool) -> Self {
        self.csrf_protection = enabled;
        self
    }

    /// Creates a new AppState from configuration.
    ///
    /// Hashes configured user secrets and starts with an empty in-memory store.
    pub fn from_config(config: &Config) -> std::result::Result<Self, ConfigError> {
        let gate = AccessGate::new(
            AccessPolicy::cashcards(config.owner_role.clone()),
            config.principal_registry()?,
        );
        let cards: Arc<dyn CardRepository> = Arc::new(InMemoryCardStore::new());

        Ok(Self::new(cards, gate).with_csrf_protection(config.csrf_protection))
    }
}

/// Handler for GET /cashcards/:id
///
/// Returns the card or 404 if no card has this id.
pub async fn get_card_handler(
    State(state): State<AppState>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<CashCard>> {
    let Path(id) = id?;
    if id == 0 {
        return Err(ApiError::Validation(
            "Card id must be a positive integer".to_string(),
        ));
    }

    state
        .cards
        .get(id)
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// Handler for POST /cashcards
///
/// Stores a card and answers 201 with a `Location` pointing at it.
pub async fn create_card_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedPrincipal>,
    payload: std::result::Result<Json<NewCashCard>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload?;

    // Validate request
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::Validation(error_msg));
    }

    let card = state.cards.put(req)?;
    info!(
        id = card.id,
        amount = %card.amount,
        username = %principal.username,
        "cash card created"
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, card.location())],
        Json(card),
    ))
}

/// Handler for GET /cashcards
///
/// Lists every card ordered by id; an empty store yields `[]`.
pub async fn list_cards_handler(State(state): State<AppState>) -> Json<Vec<CashCard>> {
    Json(state.cards.list())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
