//! # typecast-ai-output
//!
//! Reply location, schema rendering, and contract validation for
//! typecast-ai.
//!
//! ## Core pieces
//!
//! - [`schema`]: render a [`TargetContract`](typecast_ai_core::TargetContract)
//!   as a JSON schema (wrapped under `"data"` for forced output) or as a
//!   short prompt-ready description
//! - [`extract`]: dig JSON out of free text (markdown fences, prose)
//! - [`coerce`]: locate the wrapped payload, validate it recursively against
//!   the contract, and deserialize into a native value
//!
//! ## Example
//!
//! ```rust
//! use typecast_ai_core::{contract::TargetContract, request::RawReply};
//! use typecast_ai_output::{coerce::coerce, schema};
//!
//! let contract = TargetContract::list(TargetContract::integer());
//! assert_eq!(schema::describe(&contract), "an array of integers");
//!
//! let reply = RawReply::structured(serde_json::json!({"data": [3, 5, 7]}));
//! let values: Vec<i64> = coerce(&reply, &contract).unwrap();
//! assert_eq!(values, vec![3, 5, 7]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod coerce;
pub mod error;
pub mod extract;
pub mod schema;

// Re-exports
pub use coerce::{coerce, locate_payload, validate};
pub use error::{CoerceError, CoerceResult, MalformedResponseError, ValidationError};
pub use extract::extract_json;
pub use schema::{describe, forced_output_schema, json_schema, DATA_WRAPPER};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        coerce, describe, extract_json, forced_output_schema, json_schema, CoerceError,
        CoerceResult, MalformedResponseError, ValidationError, DATA_WRAPPER,
    };
}
