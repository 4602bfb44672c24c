//! Server Configuration
//!
//! Loads configuration from environment variables once at startup. Request
//! handling never reads the environment.

use anyhow::{bail, Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use std::env;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Destination and presentation settings for relayed tickets
    pub relay: RelayConfig,
}

/// Settings handed to [`crate::relay::TicketRelay`] at construction.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Chat webhook URL. `None` makes every relay fail fast.
    pub webhook_url: Option<String>,

    /// Timeout for each outbound request (default: 10s)
    pub timeout: Duration,

    /// Display name override for outbound messages
    pub username: Option<String>,

    /// Avatar override for outbound messages
    pub avatar_url: Option<String>,

    /// Embed footer text (default: "Zammad Webhook")
    pub footer_text: String,

    /// Embed footer icon
    pub footer_icon_url: Option<String>,

    /// Fixed offset used when rendering ticket dates (default: UTC)
    pub display_offset: FixedOffset,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: Duration::from_secs(10),
            username: None,
            avatar_url: None,
            footer_text: "Zammad Webhook".into(),
            footer_icon_url: None,
            display_offset: Utc.fix(),
        }
    }
}

/// Read a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = RelayConfig::default();

        let webhook_url = optional_env("DISCORD_WEBHOOK_URL");
        if let Some(ref url) = webhook_url {
            validate_webhook_url(url)?;
        }

        let timeout_secs: u64 = match optional_env("RELAY_TIMEOUT_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("RELAY_TIMEOUT_SECS must be a whole number, got {v:?}"))?,
            None => defaults.timeout.as_secs(),
        };
        if timeout_secs == 0 {
            bail!("RELAY_TIMEOUT_SECS must be greater than zero");
        }

        let display_offset = match optional_env("RELAY_DISPLAY_UTC_OFFSET_MINUTES") {
            Some(v) => parse_offset_minutes(&v)?,
            None => defaults.display_offset,
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            relay: RelayConfig {
                webhook_url,
                timeout: Duration::from_secs(timeout_secs),
                username: optional_env("RELAY_USERNAME"),
                avatar_url: optional_env("RELAY_AVATAR_URL"),
                footer_text: optional_env("RELAY_FOOTER_TEXT").unwrap_or(defaults.footer_text),
                footer_icon_url: optional_env("RELAY_FOOTER_ICON_URL"),
                display_offset,
            },
        })
    }

    /// Check if a destination webhook is configured.
    #[must_use]
    pub const fn has_webhook(&self) -> bool {
        self.relay.webhook_url.is_some()
    }

    /// Create a default configuration for testing.
    ///
    /// No webhook is configured; tests point `relay.webhook_url` at a local
    /// fake server.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            relay: RelayConfig {
                timeout: Duration::from_secs(2),
                ..RelayConfig::default()
            },
        }
    }
}

fn validate_webhook_url(url: &str) -> Result<()> {
    let parsed =
        reqwest::Url::parse(url).with_context(|| format!("DISCORD_WEBHOOK_URL is not a URL: {url:?}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("DISCORD_WEBHOOK_URL must start with http:// or https://");
    }
    if parsed.host_str().is_none() {
        bail!("DISCORD_WEBHOOK_URL must contain a host");
    }
    Ok(())
}

fn parse_offset_minutes(value: &str) -> Result<FixedOffset> {
    let minutes: i32 = value.parse().with_context(|| {
        format!("RELAY_DISPLAY_UTC_OFFSET_MINUTES must be a whole number, got {value:?}")
    })?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("RELAY_DISPLAY_UTC_OFFSET_MINUTES out of range: {minutes}"))
}
