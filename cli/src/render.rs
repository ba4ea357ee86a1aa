//! Terminal rendering of transcript entries.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::chat::{ChatMessage, Role};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render `**bold**` spans. With `ansi` off the markers are dropped.
#[must_use]
pub fn render_content(content: &str, ansi: bool) -> String {
    let (open, close) = if ansi { (BOLD, RESET) } else { ("", "") };
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("**") {
        let after = &rest[start + 2..];
        let Some(len) = after.find("**") else { break };
        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after[..len]);
        out.push_str(close);
        rest = &after[len + 2..];
    }
    out.push_str(rest);
    out
}

/// `HH:MM` in the timestamp's own offset.
#[must_use]
pub fn format_clock(ts: OffsetDateTime) -> String {
    ts.format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| String::from("--:--"))
}

#[must_use]
pub fn render_message(message: &ChatMessage, ansi: bool) -> String {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "medichain",
    };
    format!("[{}] {who}:\n{}\n", format_clock(message.timestamp), render_content(&message.content, ansi))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
