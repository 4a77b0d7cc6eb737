//! HTTP handlers for order-taking endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::order::{
    StartConversationHandler, TakeTurnCommand, TakeTurnError, TakeTurnHandler,
};
use crate::domain::foundation::SessionId;

use super::dto::{ErrorResponse, StartConversationView, TurnRequest, TurnView};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for order handlers.
#[derive(Clone)]
pub struct OrderAppState {
    pub start_conversation: Arc<StartConversationHandler>,
    pub take_turn: Arc<TakeTurnHandler>,
}

impl OrderAppState {
    pub fn new(
        start_conversation: Arc<StartConversationHandler>,
        take_turn: Arc<TakeTurnHandler>,
    ) -> Self {
        Self {
            start_conversation,
            take_turn,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/conversations
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations - Open a new order-taking conversation.
///
/// Returns the new session id and the store greeting.
pub async fn start_conversation(
    State(state): State<OrderAppState>,
) -> Result<impl IntoResponse, OrderApiError> {
    let result = state
        .start_conversation
        .handle()
        .await
        .map_err(|e| OrderApiError::Internal(e.to_string()))?;

    let view = StartConversationView {
        session_id: result.session_id.to_string(),
        greeting: result.greeting,
    };
    Ok((StatusCode::CREATED, Json(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/conversations/{session_id}/turns
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations/{id}/turns - Apply one customer utterance.
///
/// Returns the single system reply, plus ticket number and totals once the
/// order completes.
///
/// # Errors
/// - 400 Bad Request: malformed session id or empty text
/// - 404 Not Found: unknown or expired session
pub async fn take_turn(
    State(state): State<OrderAppState>,
    Path(session_id): Path<String>,
    Json(request): Json<TurnRequest>,
) -> Result<impl IntoResponse, OrderApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| OrderApiError::BadRequest("Invalid session ID format".to_string()))?;

    if request.text.trim().is_empty() {
        return Err(OrderApiError::BadRequest("Text must not be empty".to_string()));
    }

    let result = state
        .take_turn
        .handle(TakeTurnCommand {
            session_id,
            text: request.text,
        })
        .await
        .map_err(|e| match e {
            TakeTurnError::NotFound(id) => {
                OrderApiError::NotFound("Session".to_string(), id.to_string())
            }
            other => OrderApiError::Internal(other.to_string()),
        })?;

    let view = TurnView {
        reply: result.reply,
        completed: result.completed,
        ticket_number: result.ticket_number,
        totals: result.totals.map(Into::into),
    };
    Ok((StatusCode::OK, Json(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Mapping
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum OrderApiError {
    BadRequest(String),
    NotFound(String, String),
    Internal(String),
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            OrderApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            OrderApiError::NotFound(resource, id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(&resource, &id))
            }
            OrderApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
