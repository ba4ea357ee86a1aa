//! Chat session state for the interactive client.
//!
//! The transcript lives in memory for the current run only. A submission is
//! appended optimistically before the gateway answers, and while a request
//! is in flight further submissions are rejected rather than queued.

use time::OffsetDateTime;

use crate::api::{ApiError, DiagnoseApi};

pub const WELCOME_MESSAGE: &str = "Hello! I'm MediChain AI, your medical diagnostic assistant. \
Please describe your symptoms in detail, and I'll help assess your condition.\n\n\
**Important:** This is an AI diagnostic tool for informational purposes only. \
Always seek professional medical care for emergencies.";

pub const CONNECTION_ERROR_MESSAGE: &str = "⚠️ **Connection Error**\n\n\
Unable to reach the diagnostic system. Please check your connection and try again.\n\n\
If the problem persists, the coordinator agent may be offline.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// A single transcript entry.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    Empty,
    #[error("a request is already in flight")]
    Busy,
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// New session seeded with the welcome message.
    #[must_use]
    pub fn new() -> Self {
        Self { messages: vec![ChatMessage::new(Role::Assistant, WELCOME_MESSAGE)], loading: false }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Accept `input`, append it as a user message and enter the loading state.
    /// Returns the trimmed text to send.
    ///
    /// # Errors
    ///
    /// Rejects blank input, and any input while a request is in flight.
    pub fn begin(&mut self, input: &str) -> Result<String, SubmitRejected> {
        if self.loading {
            return Err(SubmitRejected::Busy);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(SubmitRejected::Empty);
        }
        self.messages.push(ChatMessage::new(Role::User, text));
        self.loading = true;
        Ok(text.to_owned())
    }

    /// Append the assistant reply (or the connection-error bubble) and leave
    /// the loading state.
    pub fn complete(&mut self, outcome: Result<String, ApiError>) -> &ChatMessage {
        let content = match outcome {
            Ok(text) => text,
            Err(_) => CONNECTION_ERROR_MESSAGE.to_owned(),
        };
        self.loading = false;
        self.messages.push(ChatMessage::new(Role::Assistant, content));
        &self.messages[self.messages.len() - 1]
    }

    /// `begin`, call the gateway, `complete`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected`] if `begin` refuses the input; gateway
    /// failures are never errors here, they become a transcript bubble.
    pub async fn submit(&mut self, api: &dyn DiagnoseApi, input: &str) -> Result<&ChatMessage, SubmitRejected> {
        let text = self.begin(input)?;
        let outcome = api.diagnose(&text).await;
        Ok(self.complete(outcome))
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;
