//! The facade's aggregate error.

use thiserror::Error;
use typecast_ai_core::errors::{ComposeError, ContractError, TransportError};
use typecast_ai_output::error::{CoerceError, MalformedResponseError, ValidationError};

/// Any failure of a facade call.
///
/// Every stage keeps its own variant so callers branch on kind: fix the
/// declaration on [`CallError::Contract`], shorten the prompt on
/// [`CallError::Compose`], retry externally on [`CallError::Transport`].
#[derive(Debug, Error)]
pub enum CallError {
    /// The declared contract is invalid. Raised before any network call.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Prompt composition failed. Raised before any network call.
    #[error(transparent)]
    Compose(#[from] ComposeError),

    /// The transport failed; propagated verbatim.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The reply could not be structurally located or parsed.
    #[error(transparent)]
    Malformed(#[from] MalformedResponseError),

    /// The reply was parsed but violates the contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<CoerceError> for CallError {
    fn from(error: CoerceError) -> Self {
        match error {
            CoerceError::Malformed(e) => Self::Malformed(e),
            CoerceError::Invalid(e) => Self::Validation(e),
        }
    }
}

/// Result type for facade calls.
pub type CallResult<T> = Result<T, CallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_error_splits_into_variants() {
        let malformed: CallError = CoerceError::Malformed(MalformedResponseError::NoJsonFound).into();
        assert!(matches!(malformed, CallError::Malformed(_)));

        let invalid: CallError =
            CoerceError::Invalid(ValidationError::missing_field("$", "name")).into();
        assert!(matches!(invalid, CallError::Validation(_)));
    }

    #[test]
    fn test_transport_error_kept_verbatim() {
        let err: CallError = TransportError::provider(429, "slow down").into();
        match err {
            CallError::Transport(t) => assert_eq!(t.status(), Some(429)),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
