//! # typecast-ai
//!
//! Typed LLM calls for Rust: declare the output shape, get back a validated
//! native value or a typed error.
//!
//! The pipeline is four stages around one transport call:
//!
//! 1. **Contract**: declare the output shape as a
//!    [`TargetContract`](typecast_ai_core::TargetContract)
//! 2. **Compose**: render a deterministic prompt with a forced-output
//!    schema ([`compose`])
//! 3. **Transport**: a pluggable [`Transport`] executes the request
//! 4. **Coerce**: the reply is located, validated against the contract,
//!    and deserialized
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use serde::Deserialize;
//! use typecast_ai::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! # tokio_test::block_on(async {
//! // A mock stands in for a real provider transport here.
//! let transport = MockTransport::new()
//!     .with_structured(serde_json::json!({"data": {"name": "Ada", "age": 36}}));
//! let caller = Caller::new(Arc::new(transport), CallConfig::new("mock", "mock-model"));
//!
//! let contract = RecordBuilder::new()
//!     .field("name", TargetContract::string())
//!     .field("age", TargetContract::integer())
//!     .build()
//!     .unwrap();
//!
//! let person: Person = caller
//!     .cast(serde_json::json!("Ada, thirty-six"), &contract)
//!     .await
//!     .unwrap();
//! assert_eq!(person.name, "Ada");
//! # });
//! ```
//!
//! ## Error handling
//!
//! Every failure is a distinct [`CallError`] variant: branch on the kind
//! (fix the declaration on `Contract`, shorten the prompt on `Compose`,
//! retry externally on `Transport`), never on message text.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod blocking;
pub mod caller;
pub mod compose;
pub mod error;
pub mod policy;
pub mod thread;
pub mod transport;

// Re-exports
pub use blocking::BlockingCaller;
pub use caller::{Caller, Task, TaskBuilder, TaskInputs};
pub use compose::{compose, ROLE_FRAMING};
pub use error::{CallError, CallResult};
pub use policy::{BudgetPolicy, NeverRetry, RetryPolicy};
pub use thread::{InMemoryThreadStore, ThreadStore};
pub use transport::{MockTransport, Transport};

pub use typecast_ai_core;
pub use typecast_ai_output;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        compose, BlockingCaller, BudgetPolicy, CallError, CallResult, Caller,
        InMemoryThreadStore, MockTransport, NeverRetry, RetryPolicy, Task, TaskBuilder,
        TaskInputs, ThreadStore, Transport,
    };
    pub use typecast_ai_core::prelude::*;
    pub use typecast_ai_output::prelude::*;
}
