//! Error types shared across the pipeline.
//!
//! Each stage has its own error enum so callers can branch on the error
//! kind rather than on message text: [`ContractError`] and [`ComposeError`]
//! surface before any network call, [`TransportError`] is propagated from
//! the transport collaborator verbatim.

use thiserror::Error;

/// The declared contract is absent, ambiguous, or self-contradictory.
///
/// Never retryable; raised at declaration time, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// No output contract was declared. Contracts are declared, never
    /// guessed.
    #[error("No output contract declared; declare one explicitly")]
    Unspecified,

    /// An enumeration contract with no members.
    #[error("Enumeration contract has no members")]
    EmptyEnumeration,

    /// An enumeration member appears more than once.
    #[error("Duplicate enumeration member: '{0}'")]
    DuplicateMember(String),

    /// A record contract with no fields.
    #[error("Record contract has no fields")]
    EmptyRecord,

    /// A record field with an empty name.
    #[error("Record field name is empty")]
    EmptyFieldName,

    /// A record field name appears more than once.
    #[error("Duplicate record field: '{0}'")]
    DuplicateField(String),
}

impl ContractError {
    /// Create a duplicate-member error.
    pub fn duplicate_member(member: impl Into<String>) -> Self {
        Self::DuplicateMember(member.into())
    }

    /// Create a duplicate-field error.
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateField(field.into())
    }
}

/// Error during prompt composition.
///
/// Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The composed instructions exceed the configured size bound.
    ///
    /// Purpose text is never silently truncated; truncation would change
    /// caller-intended semantics.
    #[error("Composed prompt is {actual} characters, exceeding the configured maximum of {limit}")]
    PromptTooLarge {
        /// Actual size in characters.
        actual: usize,
        /// Configured maximum in characters.
        limit: usize,
    },

    /// The contract handed to the composer is malformed.
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ComposeError {
    /// Create a prompt-too-large error.
    #[must_use]
    pub fn too_large(actual: usize, limit: usize) -> Self {
        Self::PromptTooLarge { actual, limit }
    }
}

/// Failure at the external transport boundary.
///
/// The pipeline never swallows or reinterprets these; they reach the caller
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Network-level failure (connection, DNS, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Authentication or authorization failure.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The provider rate-limited the request.
    #[error("Rate limited{}", retry_after_hint(.retry_after_secs))]
    RateLimited {
        /// Provider-suggested wait before retrying, when given.
        retry_after_secs: Option<u64>,
    },

    /// The request timed out.
    #[error("Request timed out after {elapsed_secs}s")]
    Timeout {
        /// Seconds elapsed before giving up.
        elapsed_secs: u64,
    },

    /// Provider returned an error status.
    #[error("Provider error {status}: {message}")]
    Provider {
        /// HTTP-like status code.
        status: u16,
        /// Provider error message.
        message: String,
    },
}

fn retry_after_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(", retry after {secs}s"),
        None => String::new(),
    }
}

impl TransportError {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Create a provider error.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status,
            message: message.into(),
        }
    }

    /// Status code, when the failure carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether re-issuing the same request could plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Provider { status, .. } => (500..=599).contains(status),
            Self::Authentication(_) => false,
        }
    }
}
