use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, check_in, check_out, get_borrower, list_claimable, list_loans,
    list_reservations, reserve,
};

/// Creates the API router with all lending endpoints
///
/// Command endpoints (Write operations):
/// - POST /loans - Check out a batch of items
/// - POST /loans/return - Check in a batch of items
/// - POST /reservations - Reserve an item
///
/// Query endpoints (Read operations):
/// - GET /loans - List current loans, optionally for one customer
/// - GET /items/:item_id/borrower - Current borrower of an item
/// - GET /items/:item_id/reservations - Reservation queue of an item
/// - GET /reservations/claimable - Items a customer can claim now
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/loans", post(check_out).get(list_loans))
        .route("/loans/return", post(check_in))
        .route("/reservations", post(reserve))
        // Query endpoints (Read operations)
        .route("/items/:item_id/borrower", get(get_borrower))
        .route("/items/:item_id/reservations", get(list_reservations))
        .route("/reservations/claimable", get(list_claimable))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
