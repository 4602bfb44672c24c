//! Relay HTTP Handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use super::error::{RelayError, RelayOutcome};
use super::types::{MessageResponse, RelayResponse, TicketEvent};
use crate::api::AppState;

/// GET /discord
#[utoipa::path(
    get,
    path = "/discord",
    tag = "relay",
    responses(
        (status = 200, description = "Relay endpoint is reachable", body = MessageResponse),
    ),
)]
pub async fn relay_info() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Ticket relay - POST ticket webhooks to this endpoint".to_string(),
    })
}

/// POST /discord
///
/// Accepts any body. Anything that is not a ticket object is relayed with
/// placeholders rather than rejected.
#[utoipa::path(
    post,
    path = "/discord",
    tag = "relay",
    request_body = TicketEvent,
    responses(
        (status = 200, description = "Ticket relayed", body = RelayResponse),
        (status = 207, description = "Ticket accepted, destination rejected it", body = RelayResponse),
        (status = 500, description = "Relay not configured or destination unreachable", body = RelayResponse),
    ),
)]
#[tracing::instrument(skip_all, fields(body_len = body.len()))]
pub async fn relay_ticket(State(state): State<AppState>, body: Bytes) -> RelayOutcome {
    let event = TicketEvent::from_slice(&body);

    // Run detached so a started delivery completes even if the caller hangs up.
    let relay = state.relay.clone();
    match tokio::spawn(async move { relay.handle(event).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Relay task panicked");
            RelayOutcome::Failed {
                error: RelayError::TaskFailed(e.to_string()),
            }
        }
    }
}
