//! Ticket Relay Server
//!
//! Relays ticketing-system webhooks (Zammad) to a chat webhook (Discord) as
//! formatted embeds and reports the delivery outcome to the caller.

pub mod api;
pub mod config;
pub mod relay;
