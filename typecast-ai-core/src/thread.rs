//! Thread identifiers and exchange history types.
//!
//! A thread is an ordered, append-only sequence of prior exchanges scoped
//! to a [`ThreadId`]. The pipeline only reads history; the store that owns
//! the sequence lives in the facade crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::request::{RawReply, RenderedRequest};

/// Type-safe wrapper for a thread identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Generate a fresh thread ID, prefixed `thread_`.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("thread_{}", Uuid::new_v4().simple()))
    }

    /// Create from an existing string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed request/reply pair in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// The rendered request that was sent.
    pub request: RenderedRequest,
    /// The reply the transport returned.
    pub reply: RawReply,
    /// When the exchange completed.
    pub at: DateTime<Utc>,
}

impl Exchange {
    /// Create an exchange timestamped now.
    #[must_use]
    pub fn new(request: RenderedRequest, reply: RawReply) -> Self {
        Self {
            request,
            reply,
            at: Utc::now(),
        }
    }

    /// Render this exchange as prompt text for session continuity.
    ///
    /// Inputs are replayed rather than the full system instructions, so a
    /// replayed thread grows with the conversation, not quadratically.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (label, value) in &self.request.input_payload {
            out.push_str(&format!("[prior input] {label}: {value}\n"));
        }
        out.push_str(&format!("[prior output] {}\n", self.reply.render()));
        out
    }
}
