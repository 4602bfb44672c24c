//! Relay Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::{RelayResponse, TicketSummary};

/// Why a relay did not fully succeed.
///
/// Malformed input is absent on purpose: it is absorbed by placeholders while
/// the payload is decoded and never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Discord webhook URL not configured")]
    MissingConfiguration,

    #[error("Discord webhook failed: {status} - {body}")]
    UpstreamRejected { status: u16, body: String },

    /// Transport failure. Built through `From`, which drops the request URL.
    #[error("Discord webhook unreachable: {0}")]
    Network(reqwest::Error),

    #[error("Relay task failed: {0}")]
    TaskFailed(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        // The webhook URL path carries its secret token.
        Self::Network(e.without_url())
    }
}

/// Result of relaying one ticket event.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The destination accepted the notification.
    Delivered { ticket: TicketSummary },
    /// The request was accepted but the destination rejected the notification.
    PartiallyDelivered {
        ticket: TicketSummary,
        error: RelayError,
    },
    /// Nothing was delivered.
    Failed { error: RelayError },
}

impl RelayOutcome {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Delivered { .. } => StatusCode::OK,
            Self::PartiallyDelivered { .. } => StatusCode::MULTI_STATUS,
            Self::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Diagnostic text for anything short of full delivery.
    #[must_use]
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Delivered { .. } => None,
            Self::PartiallyDelivered { error, .. } | Self::Failed { error } => Some(error.to_string()),
        }
    }

    #[must_use]
    pub const fn ticket(&self) -> Option<&TicketSummary> {
        match self {
            Self::Delivered { ticket } | Self::PartiallyDelivered { ticket, .. } => Some(ticket),
            Self::Failed { .. } => None,
        }
    }
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Delivered { ticket } => RelayResponse {
                message: "Ticket data received and sent to Discord successfully".to_string(),
                error: None,
                ticket: Some(ticket),
            },
            Self::PartiallyDelivered { ticket, error } => RelayResponse {
                message: "Ticket data received but Discord rejected the notification".to_string(),
                error: Some(error.to_string()),
                ticket: Some(ticket),
            },
            Self::Failed { error } => {
                let message = match &error {
                    RelayError::MissingConfiguration => error.to_string(),
                    _ => "Error sending data to Discord".to_string(),
                };
                RelayResponse {
                    message,
                    error: Some(error.to_string()),
                    ticket: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
