//! Axum routes for order-taking endpoints.

use axum::routing::post;
use axum::Router;

use super::handlers::{start_conversation, take_turn, OrderAppState};

/// Creates routes for order endpoints.
///
/// REST Endpoints:
/// - POST /api/conversations - Open a new conversation
/// - POST /api/conversations/{session_id}/turns - Send one utterance
pub fn order_routes() -> Router<OrderAppState> {
    Router::new()
        .route("/conversations", post(start_conversation))
        .route("/conversations/:session_id/turns", post(take_turn))
}

/// Combined router with all order routes under /api.
pub fn order_router() -> Router<OrderAppState> {
    Router::new().nest("/api", order_routes())
}
