//! Message Formatting
//!
//! Turns a [`TicketEvent`] into the chat message and caller summary. Every
//! lookup falls back to a placeholder; nothing here can fail.

use std::cmp::Reverse;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use super::embed::{
    ChatMessage, Embed, EmbedField, EmbedFooter, COLOR_GRAY, COLOR_GREEN, COLOR_RED, COLOR_YELLOW,
};
use super::types::{Person, TicketEvent, TicketSummary};
use crate::config::RelayConfig;

pub const NO_NUMBER: &str = "N/A";
pub const NO_TITLE: &str = "No title";
pub const NOT_INFORMED: &str = "Not informed";
pub const UNASSIGNED: &str = "Unassigned";

/// Layout for rendered creation dates (day first, as in pt-BR).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Naive layouts accepted after RFC 3339; interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// Discord embed limits.
const MAX_TITLE_CHARS: usize = 256;
const MAX_DESCRIPTION_CHARS: usize = 4096;
const MAX_FIELD_VALUE_CHARS: usize = 1024;
const MAX_FOOTER_CHARS: usize = 2048;
pub const MAX_EMBED_CHARS: usize = 6000;

/// Map a ticket state to an embed color.
pub fn state_color(state: Option<&str>) -> u32 {
    match state.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("open" | "new") => COLOR_GREEN,
        Some("closed") => COLOR_RED,
        Some("pending") => COLOR_YELLOW,
        _ => COLOR_GRAY,
    }
}

/// Join first and last name, collapsing whitespace.
///
/// Returns `placeholder` only when both parts are empty after trimming.
pub fn format_person_name(person: Option<&Person>, placeholder: &str) -> String {
    let Some(person) = person else {
        return placeholder.to_string();
    };

    let name = [person.firstname.as_deref(), person.lastname.as_deref()]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        placeholder.to_string()
    } else {
        name
    }
}

/// Render a creation timestamp in the display offset.
pub fn format_created_at(raw: Option<&str>, offset: FixedOffset) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.with_timezone(&offset).format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_INFORMED.to_string())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn text_or(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Truncate to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Extract the caller-facing summary of a ticket event.
pub fn summarize(event: &TicketEvent, offset: FixedOffset) -> TicketSummary {
    let ticket = event.ticket();

    TicketSummary {
        number: text_or(ticket.and_then(|t| t.number.as_deref()), NO_NUMBER),
        title: text_or(ticket.and_then(|t| t.title.as_deref()), NO_TITLE),
        customer: format_person_name(event.customer(), NOT_INFORMED),
        status: text_or(ticket.and_then(|t| t.state.as_deref()), NOT_INFORMED),
        created_at: format_created_at(ticket.and_then(|t| t.created_at.as_deref()), offset),
    }
}

/// Build the notification for a ticket event.
pub fn build_ticket_message(
    event: &TicketEvent,
    summary: &TicketSummary,
    config: &RelayConfig,
    now: DateTime<Utc>,
) -> ChatMessage {
    let ticket = event.ticket();

    let fields = vec![
        EmbedField::inline("👤 Customer", field_value(&summary.customer)),
        EmbedField::inline(
            "📧 Email",
            field_value(&text_or(
                event.customer().and_then(|c| c.email.as_deref()),
                NOT_INFORMED,
            )),
        ),
        EmbedField::inline(
            "🏢 Organization",
            field_value(&text_or(
                event.organization().and_then(|o| o.name.as_deref()),
                NOT_INFORMED,
            )),
        ),
        EmbedField::inline(
            "👨‍💼 Owner",
            field_value(&format_person_name(event.owner(), UNASSIGNED)),
        ),
        EmbedField::inline("📊 Status", field_value(&summary.status)),
        EmbedField::inline(
            "⚡ Priority",
            field_value(&text_or(
                ticket
                    .and_then(|t| t.priority.as_ref())
                    .and_then(|p| p.name.as_deref()),
                NOT_INFORMED,
            )),
        ),
        EmbedField::block("📅 Created at", field_value(&summary.created_at)),
    ];

    let mut embed = Embed {
        title: truncate_chars(&format!("🎫 Ticket #{}", summary.number), MAX_TITLE_CHARS),
        description: truncate_chars(&summary.title, MAX_DESCRIPTION_CHARS),
        color: state_color(ticket.and_then(|t| t.state.as_deref())),
        fields,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        footer: footer(config),
    };
    fit_embed(&mut embed);

    ChatMessage {
        username: config.username.clone(),
        avatar_url: config.avatar_url.clone(),
        embeds: vec![embed],
    }
}

/// Build the message reporting a failed relay of `summary`.
pub fn build_error_report(
    summary: &TicketSummary,
    reason: &str,
    config: &RelayConfig,
    now: DateTime<Utc>,
) -> ChatMessage {
    let mut embed = Embed {
        title: "⚠️ Ticket relay error".to_string(),
        description: truncate_chars(reason, MAX_DESCRIPTION_CHARS),
        color: COLOR_RED,
        fields: vec![
            EmbedField::inline("🎫 Ticket", field_value(&summary.number)),
            EmbedField::inline("📝 Title", field_value(&summary.title)),
        ],
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        footer: footer(config),
    };
    fit_embed(&mut embed);

    ChatMessage {
        username: config.username.clone(),
        avatar_url: config.avatar_url.clone(),
        embeds: vec![embed],
    }
}

fn field_value(value: &str) -> String {
    truncate_chars(value, MAX_FIELD_VALUE_CHARS)
}

/// Shrink the description, then the longest field values, until the embed
/// fits [`MAX_EMBED_CHARS`].
fn fit_embed(embed: &mut Embed) {
    let mut excess = embed.char_count().saturating_sub(MAX_EMBED_CHARS);
    if excess == 0 {
        return;
    }

    excess = shrink(&mut embed.description, excess);

    let mut longest_first: Vec<usize> = (0..embed.fields.len()).collect();
    longest_first.sort_by_key(|&i| Reverse(embed.fields[i].value.chars().count()));
    for i in longest_first {
        if excess == 0 {
            break;
        }
        excess = shrink(&mut embed.fields[i].value, excess);
    }
}

/// Cut up to `excess` characters from `text`, keeping at least one.
/// Returns how many characters are still over.
fn shrink(text: &mut String, excess: usize) -> usize {
    let len = text.chars().count();
    let keep = len.saturating_sub(excess).max(1);
    if keep >= len {
        return excess;
    }
    *text = truncate_chars(text, keep);
    excess - (len - keep)
}

fn footer(config: &RelayConfig) -> EmbedFooter {
    EmbedFooter {
        text: truncate_chars(&config.footer_text, MAX_FOOTER_CHARS),
        icon_url: config.footer_icon_url.clone(),
    }
}
