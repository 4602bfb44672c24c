//! Relay Types
//!
//! Inbound ticket payload, outbound summary and response bodies.
//!
//! Every inbound field is optional, and a field of the wrong shape decodes as
//! absent instead of rejecting the request.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound ticket event as posted by the ticketing system.
///
/// Related records are accepted both nested under `ticket` and at the top
/// level of the payload. Use the accessors to read them.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct TicketEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub ticket: Option<Ticket>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer: Option<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub organization: Option<Organization>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner: Option<Person>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct Ticket {
    /// Ticket number; rendered as text whether sent as a string or an integer.
    #[serde(default, deserialize_with = "lenient_text")]
    pub number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer: Option<Person>,
    #[serde(default, deserialize_with = "lenient")]
    pub organization: Option<Organization>,
    #[serde(default, deserialize_with = "lenient")]
    pub owner: Option<Person>,
}

/// Customer or owner record.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct Person {
    #[serde(default, deserialize_with = "lenient_text")]
    pub firstname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct Organization {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct Priority {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

impl TicketEvent {
    /// Decode a raw request body, falling back to an empty event.
    ///
    /// Never fails: an empty body, invalid JSON or a non-object document all
    /// produce `TicketEvent::default()`.
    pub fn from_slice(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ticket payload did not decode, using defaults");
                Self::default()
            }),
            Ok(_) => {
                tracing::warn!("Ticket payload is not a JSON object, using defaults");
                Self::default()
            }
            Err(e) => {
                let preview: String = String::from_utf8_lossy(body).chars().take(200).collect();
                tracing::warn!(
                    error = %e,
                    payload_preview = %preview,
                    "Ticket payload is not valid JSON, using defaults"
                );
                Self::default()
            }
        }
    }

    pub fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub fn customer(&self) -> Option<&Person> {
        self.ticket()
            .and_then(|t| t.customer.as_ref())
            .or(self.customer.as_ref())
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.ticket()
            .and_then(|t| t.organization.as_ref())
            .or(self.organization.as_ref())
    }

    pub fn owner(&self) -> Option<&Person> {
        self.ticket()
            .and_then(|t| t.owner.as_ref())
            .or(self.owner.as_ref())
    }
}

/// Decode any value into `T`, treating a mismatched shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a scalar as text. Objects, arrays and null are absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Ticket details echoed back to the caller.
///
/// Carries the same rendered values, placeholders included, that were sent in
/// the chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct TicketSummary {
    pub number: String,
    pub title: String,
    pub customer: String,
    pub status: String,
    pub created_at: String,
}

/// Body of `GET /discord`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `POST /discord` for every outcome.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RelayResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<TicketSummary>,
}
