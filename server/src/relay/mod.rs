//! Ticket Relay
//!
//! Receives ticketing-system webhooks and forwards them to a chat webhook as
//! formatted embeds.

pub mod delivery;
pub mod embed;
pub mod error;
pub mod format;
pub mod handlers;
pub mod types;

pub use delivery::TicketRelay;
pub use error::{RelayError, RelayOutcome};
pub use types::{TicketEvent, TicketSummary};
