//! Coercing raw replies into contract-satisfying native values.
//!
//! Coercion is purely structural: locate the wrapped payload, walk it
//! against the contract, then deserialize. It never re-invokes the
//! transport and never attempts self-repair; a malformed reply is a hard
//! failure surfaced to the caller. Retrying is the facade's policy, not
//! this module's.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use typecast_ai_core::contract::{ScalarKind, Shape, TargetContract};
use typecast_ai_core::request::RawReply;

use crate::error::{CoerceError, CoerceResult, MalformedResponseError, ValidationError};
use crate::extract::extract_json;
use crate::schema::DATA_WRAPPER;

/// Coerce a raw reply into a native value satisfying `contract`.
///
/// For an unconstrained text contract the reply text is returned as-is with
/// no validation. Otherwise the payload is located under the
/// [`DATA_WRAPPER`] key, validated recursively against the contract, and
/// only then deserialized.
///
/// # Errors
///
/// [`CoerceError::Malformed`] when the payload cannot be located,
/// [`CoerceError::Invalid`] when it violates the contract.
///
/// # Example
///
/// ```rust
/// use typecast_ai_core::{contract::TargetContract, request::RawReply};
/// use typecast_ai_output::coerce::coerce;
///
/// let contract = TargetContract::list(TargetContract::integer());
/// let reply = RawReply::structured(serde_json::json!({"data": [3, 5, 7]}));
/// let values: Vec<i64> = coerce(&reply, &contract).unwrap();
/// assert_eq!(values, vec![3, 5, 7]);
/// ```
pub fn coerce<T: DeserializeOwned>(reply: &RawReply, contract: &TargetContract) -> CoerceResult<T> {
    if !contract.is_constrained() {
        let text = match reply {
            RawReply::Text(text) => text.clone(),
            // A transport may still wrap free text; unwrap when it did.
            RawReply::Structured(value) => match value.get(DATA_WRAPPER) {
                Some(JsonValue::String(text)) => text.clone(),
                _ => value.to_string(),
            },
        };
        return serde_json::from_value(JsonValue::String(text))
            .map_err(|e| CoerceError::Invalid(ValidationError::Deserialize(e.to_string())));
    }

    let payload = locate_payload(reply)?;
    validate(&payload, contract, "$")?;
    serde_json::from_value(payload)
        .map_err(|e| CoerceError::Invalid(ValidationError::Deserialize(e.to_string())))
}

/// Locate the wrapped payload inside a raw reply.
///
/// Structured replies must be an object carrying the [`DATA_WRAPPER`] key.
/// Text replies are searched for JSON first, then held to the same rule.
pub fn locate_payload(reply: &RawReply) -> Result<JsonValue, MalformedResponseError> {
    let value = match reply {
        RawReply::Structured(value) => value.clone(),
        RawReply::Text(text) => extract_json(text)?,
    };
    match value {
        JsonValue::Object(mut map) => map
            .remove(DATA_WRAPPER)
            .ok_or_else(MalformedResponseError::missing_wrapper),
        _ => Err(MalformedResponseError::missing_wrapper()),
    }
}

/// Walk `value` against `contract`, failing on the first violation.
///
/// `path` names the current location for error reporting, rooted at `$`.
pub fn validate(
    value: &JsonValue,
    contract: &TargetContract,
    path: &str,
) -> Result<(), ValidationError> {
    match &contract.shape {
        Shape::Text => Ok(()),

        Shape::Scalar { scalar } => {
            let ok = match scalar {
                ScalarKind::Boolean => value.is_boolean(),
                // A float with a fractional part is not an integer.
                ScalarKind::Integer => value.is_i64() || value.is_u64(),
                ScalarKind::Number => value.is_number(),
                ScalarKind::String => value.is_string(),
            };
            if ok {
                Ok(())
            } else {
                Err(ValidationError::kind_mismatch(
                    path,
                    scalar.type_name(),
                    json_kind(value),
                ))
            }
        }

        Shape::Enumeration { members } => {
            let candidate = value.as_str().ok_or_else(|| {
                ValidationError::kind_mismatch(path, "enumeration", json_kind(value))
            })?;
            if members.iter().any(|m| m == candidate) {
                Ok(())
            } else {
                Err(ValidationError::not_a_member(
                    path,
                    candidate,
                    members.clone(),
                ))
            }
        }

        Shape::List { element } => {
            let items = value
                .as_array()
                .ok_or_else(|| ValidationError::kind_mismatch(path, "list", json_kind(value)))?;
            for (i, item) in items.iter().enumerate() {
                validate(item, element, &format!("{path}[{i}]"))?;
            }
            Ok(())
        }

        Shape::Record { fields } => {
            let map = value
                .as_object()
                .ok_or_else(|| ValidationError::kind_mismatch(path, "record", json_kind(value)))?;
            // Unknown keys are ignored; the contract only constrains what
            // the caller asked for.
            for (name, field) in fields {
                match map.get(name) {
                    Some(inner) => validate(inner, &field.contract, &format!("{path}.{name}"))?,
                    None if field.required => {
                        return Err(ValidationError::missing_field(path, name));
                    }
                    None => {}
                }
            }
            Ok(())
        }
    }
}

/// JSON kind name for error messages.
fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => "integer",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
