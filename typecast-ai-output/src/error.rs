//! Error types for reply location and contract validation.

use thiserror::Error;

/// The raw reply could not be structurally located or parsed at all.
#[derive(Debug, Error)]
pub enum MalformedResponseError {
    /// No JSON object or array could be found in the reply text.
    #[error("No JSON object or array found in reply")]
    NoJsonFound,

    /// The reply parsed as JSON but the answer wrapper is missing.
    #[error("Reply has no '{wrapper}' payload wrapper")]
    MissingWrapper {
        /// The expected wrapper key.
        wrapper: &'static str,
    },

    /// The located candidate failed to parse as JSON.
    #[error("Failed to parse reply JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl MalformedResponseError {
    /// Create a missing-wrapper error for the standard wrapper key.
    #[must_use]
    pub fn missing_wrapper() -> Self {
        Self::MissingWrapper {
            wrapper: crate::schema::DATA_WRAPPER,
        }
    }
}

/// The reply was parsed but does not satisfy the contract.
///
/// Every variant carries the path to the offending location, rooted at `$`
/// (the unwrapped payload).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required record field is absent.
    #[error("Missing required field '{field}' at {path}")]
    MissingField {
        /// Path to the record.
        path: String,
        /// The absent field name.
        field: String,
    },

    /// A value has the wrong kind for its contract.
    #[error("Expected {expected} at {path}, got {actual}")]
    KindMismatch {
        /// Path to the value.
        path: String,
        /// Contract kind name.
        expected: &'static str,
        /// JSON kind name of what was found.
        actual: &'static str,
    },

    /// An enumeration value is not one of the declared members.
    ///
    /// Matching is exact: a close-but-wrong value is this error, never
    /// silently coerced to the nearest option.
    #[error("Value '{value}' at {path} is not one of: {}", members.join(", "))]
    NotAMember {
        /// Path to the value.
        path: String,
        /// The value that was received.
        value: String,
        /// The declared members.
        members: Vec<String>,
    },

    /// The payload satisfied the contract structurally but could not be
    /// deserialized into the requested native type.
    #[error("Failed to deserialize validated payload: {0}")]
    Deserialize(String),
}

impl ValidationError {
    /// Create a missing-field error.
    pub fn missing_field(path: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            path: path.into(),
            field: field.into(),
        }
    }

    /// Create a kind-mismatch error.
    pub fn kind_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::KindMismatch {
            path: path.into(),
            expected,
            actual,
        }
    }

    /// Create a not-a-member error.
    pub fn not_a_member(
        path: impl Into<String>,
        value: impl Into<String>,
        members: Vec<String>,
    ) -> Self {
        Self::NotAMember {
            path: path.into(),
            value: value.into(),
            members,
        }
    }
}

/// Either kind of local coercion failure.
///
/// The coercer never retries; whether these are retried by re-issuing the
/// same request is the facade's policy.
#[derive(Debug, Error)]
pub enum CoerceError {
    /// The reply could not be located or parsed.
    #[error(transparent)]
    Malformed(#[from] MalformedResponseError),

    /// The reply was parsed but failed the contract.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Result type for coercion.
pub type CoerceResult<T> = Result<T, CoerceError>;
