//! Rendered requests and raw replies.
//!
//! [`RenderedRequest`] is the fully composed instruction handed to the
//! transport; [`RawReply`] is what comes back. Both are plain values: the
//! transport collaborator owns whatever wire format the chosen provider
//! expects.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A fully composed request, immutable once built.
///
/// Invariant: `forced_output_schema` is `Some` exactly when the contract the
/// request was composed for is constrained (anything but free text). The
/// composer enforces this; nothing downstream re-checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRequest {
    /// System instructions in fixed section order: prior exchanges, role
    /// framing, declared purpose, schema constraint, caller instructions.
    pub system_instructions: String,

    /// The caller's actual arguments as labeled key/value pairs, in the
    /// order they were supplied.
    pub input_payload: Vec<(String, JsonValue)>,

    /// Machine-checkable description of the expected reply shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_output_schema: Option<JsonValue>,
}

impl RenderedRequest {
    /// Create a request with the given system instructions.
    #[must_use]
    pub fn new(system_instructions: impl Into<String>) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            input_payload: Vec::new(),
            forced_output_schema: None,
        }
    }

    /// Append a labeled input value.
    #[must_use]
    pub fn with_input(mut self, label: impl Into<String>, value: JsonValue) -> Self {
        self.input_payload.push((label.into(), value));
        self
    }

    /// Attach the forced-output schema.
    #[must_use]
    pub fn with_schema(mut self, schema: JsonValue) -> Self {
        self.forced_output_schema = Some(schema);
        self
    }

    /// Look up an input value by label.
    #[must_use]
    pub fn input(&self, label: &str) -> Option<&JsonValue> {
        self.input_payload
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }
}

/// The raw model output returned by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawReply {
    /// Free-form text.
    Text(String),
    /// A structured payload, e.g. captured from a forced tool call.
    Structured(JsonValue),
}

impl RawReply {
    /// Create a text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a structured reply.
    #[must_use]
    pub fn structured(value: JsonValue) -> Self {
        Self::Structured(value)
    }

    /// The reply text, when this is a text reply.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }

    /// Compact single-line rendering, used when replaying prior exchanges
    /// into a later prompt.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_inputs_preserve_order() {
        let request = RenderedRequest::new("do the thing")
            .with_input("b", serde_json::json!(2))
            .with_input("a", serde_json::json!(1));

        let labels: Vec<_> = request
            .input_payload
            .iter()
            .map(|(l, _)| l.clone())
            .collect();
        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(request.input("a"), Some(&serde_json::json!(1)));
        assert_eq!(request.input("missing"), None);
    }

    #[test]
    fn test_reply_render() {
        assert_eq!(RawReply::text("hi").render(), "hi");
        assert_eq!(
            RawReply::structured(serde_json::json!({"data": 3})).render(),
            r#"{"data":3}"#
        );
    }

    #[test]
    fn test_request_serde_roundtrip() {
        let request = RenderedRequest::new("purpose")
            .with_input("text", serde_json::json!("I love this"))
            .with_schema(serde_json::json!({"type": "object"}));

        let json = serde_json::to_string(&request).unwrap();
        let parsed: RenderedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request, parsed);
    }
}
