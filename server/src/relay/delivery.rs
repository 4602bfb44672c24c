//! Ticket Delivery
//!
//! Sends formatted ticket notifications to the configured chat webhook.
//!
//! Each relay is a single POST. There is no retry or queueing; when the
//! destination cannot be reached at all, one best-effort error report is sent
//! to the same endpoint and its result is only logged.
//!
//! Webhook URLs embed a secret token and are never logged.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use super::embed::ChatMessage;
use super::error::{RelayError, RelayOutcome};
use super::format;
use super::types::{TicketEvent, TicketSummary};
use crate::config::RelayConfig;

/// Maximum characters of an upstream error body kept as diagnostic text.
const MAX_DIAGNOSTIC_CHARS: usize = 500;

/// Relays ticket events to one chat webhook.
///
/// Holds no per-request state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TicketRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl TicketRelay {
    /// Build a relay with its own HTTP client bounded by `config.timeout`.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("ticket-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Relay one ticket event and describe what happened.
    ///
    /// Never fails: every problem is folded into the returned outcome.
    #[instrument(skip_all, fields(ticket = tracing::field::Empty))]
    pub async fn handle(&self, event: TicketEvent) -> RelayOutcome {
        let summary = format::summarize(&event, self.config.display_offset);
        tracing::Span::current().record("ticket", summary.number.as_str());

        let Some(url) = self.config.webhook_url.as_deref() else {
            error!("Discord webhook URL not configured, rejecting ticket");
            return RelayOutcome::Failed {
                error: RelayError::MissingConfiguration,
            };
        };

        let message = format::build_ticket_message(&event, &summary, &self.config, Utc::now());

        match self.send(url, &message).await {
            Ok(()) => {
                info!(status = %summary.status, "Ticket relayed to Discord");
                RelayOutcome::Delivered { ticket: summary }
            }
            Err(e @ RelayError::UpstreamRejected { .. }) => {
                warn!(error = %e, "Discord rejected ticket notification");
                RelayOutcome::PartiallyDelivered {
                    ticket: summary,
                    error: e,
                }
            }
            Err(e) => {
                error!(error = %e, "Error sending ticket to Discord");
                self.report_failure(url, &summary, &e).await;
                RelayOutcome::Failed { error: e }
            }
        }
    }

    /// Best-effort notice to the destination that a relay failed.
    ///
    /// The result is logged and otherwise discarded.
    pub async fn report_failure(&self, url: &str, summary: &TicketSummary, failure: &RelayError) {
        let report =
            format::build_error_report(summary, &failure.to_string(), &self.config, Utc::now());

        match self.send(url, &report).await {
            Ok(()) => info!("Relay failure reported to Discord"),
            Err(e) => warn!(error = %e, "Failed to report relay failure to Discord"),
        }
    }

    async fn send(&self, url: &str, message: &ChatMessage) -> Result<(), RelayError> {
        let start = Instant::now();
        let response = self.client.post(url).json(message).send().await?;
        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            debug!(status = status.as_u16(), latency_ms, "Discord accepted message");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(RelayError::UpstreamRejected {
            status: status.as_u16(),
            body: format::truncate_chars(&body, MAX_DIAGNOSTIC_CHARS),
        })
    }
}
