//! # typecast-ai-core
//!
//! Core types for the typecast-ai pipeline.
//!
//! This crate provides the foundational values the rest of the workspace is
//! built on:
//!
//! - **Contracts**: the declared output shape ([`TargetContract`])
//! - **Requests**: composed requests and raw replies
//! - **Threads**: identifiers and exchange history types
//! - **Settings**: explicit per-facade configuration
//! - **Errors**: stage-specific error enums
//!
//! ## Example
//!
//! ```rust
//! use typecast_ai_core::{
//!     contract::{RecordBuilder, TargetContract},
//!     request::RenderedRequest,
//!     settings::CallConfig,
//! };
//!
//! let contract = RecordBuilder::new()
//!     .field("sentiment", TargetContract::enumeration(["positive", "negative"]).unwrap())
//!     .field("confidence", TargetContract::number())
//!     .build()
//!     .unwrap();
//!
//! let config = CallConfig::new("openai", "gpt-4o").with_retry_budget(2);
//! assert!(contract.is_constrained());
//! assert_eq!(config.retry_budget, 2);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod contract;
pub mod errors;
pub mod request;
pub mod settings;
pub mod thread;

// Re-exports for convenience
pub use contract::{Field, RecordBuilder, ScalarKind, Shape, TargetContract};
pub use errors::{ComposeError, ContractError, TransportError};
pub use request::{RawReply, RenderedRequest};
pub use settings::{CallConfig, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_RETRY_BUDGET};
pub use thread::{Exchange, ThreadId};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::contract::{RecordBuilder, ScalarKind, Shape, TargetContract};
    pub use crate::errors::{ComposeError, ContractError, TransportError};
    pub use crate::request::{RawReply, RenderedRequest};
    pub use crate::settings::CallConfig;
    pub use crate::thread::{Exchange, ThreadId};
}
