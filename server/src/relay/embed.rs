//! Chat Webhook Message Types
//!
//! Wire format of the document POSTed to a Discord-compatible webhook.

use serde::Serialize;

/// Embed color for open and new tickets.
pub const COLOR_GREEN: u32 = 0x00FF00;
/// Embed color for closed tickets and error reports.
pub const COLOR_RED: u32 = 0xFF0000;
/// Embed color for pending tickets.
pub const COLOR_YELLOW: u32 = 0xFFFF00;
/// Embed color for any other state.
pub const COLOR_GRAY: u32 = 0x808080;

/// Top-level webhook execution body.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ChatMessage {
    /// Overrides the webhook's default display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Overrides the webhook's default avatar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub embeds: Vec<Embed>,
}

/// A single styled message block.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct Embed {
    pub title: String,
    pub description: String,
    /// Integer RGB.
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// ISO-8601 timestamp shown by the client next to the footer.
    pub timestamp: String,
    pub footer: EmbedFooter,
}

impl Embed {
    /// Characters counted against the per-embed total limit.
    pub fn char_count(&self) -> usize {
        self.title.chars().count()
            + self.description.chars().count()
            + self
                .fields
                .iter()
                .map(|f| f.name.chars().count() + f.value.chars().count())
                .sum::<usize>()
            + self.footer.text.chars().count()
    }
}

/// Labeled value inside an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    /// Whether the client may render this field next to its neighbours.
    pub inline: bool,
}

impl EmbedField {
    pub fn inline(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline: true,
        }
    }

    pub fn block(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}
