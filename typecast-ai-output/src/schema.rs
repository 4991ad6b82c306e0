//! Rendering contracts as schemas.
//!
//! Two renderings of the same [`TargetContract`]: a machine-checkable JSON
//! schema for the transport's forced-output mechanism, and a short
//! human-readable description that the composer folds into the prompt.

use serde_json::{json, Value as JsonValue};
use typecast_ai_core::contract::{ScalarKind, Shape, TargetContract};

/// Key the answer is wrapped under in structured replies.
///
/// The wrapper disambiguates the answer from any surrounding tool-call
/// framing the provider adds.
pub const DATA_WRAPPER: &str = "data";

/// Render a contract as a JSON schema fragment.
#[must_use]
pub fn json_schema(contract: &TargetContract) -> JsonValue {
    let mut schema = match &contract.shape {
        // Free text still describes itself as a string when asked, even
        // though no forced schema is attached for it.
        Shape::Text => json!({"type": "string"}),
        Shape::Scalar { scalar } => json!({"type": scalar.type_name()}),
        Shape::Enumeration { members } => json!({"type": "string", "enum": members}),
        Shape::List { element } => json!({
            "type": "array",
            "items": json_schema(element),
        }),
        Shape::Record { fields } => {
            let mut properties = serde_json::Map::new();
            let mut required = Vec::new();
            for (name, field) in fields {
                properties.insert(name.clone(), json_schema(&field.contract));
                if field.required {
                    required.push(JsonValue::String(name.clone()));
                }
            }
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            })
        }
    };
    if let Some(description) = &contract.description {
        schema["description"] = JsonValue::String(description.clone());
    }
    schema
}

/// Render the forced-output schema for a contract.
///
/// The contract schema is wrapped in an object with a single required
/// [`DATA_WRAPPER`] property. Returns `None` for unconstrained text, which
/// signals free-text mode to the composer.
#[must_use]
pub fn forced_output_schema(contract: &TargetContract) -> Option<JsonValue> {
    if !contract.is_constrained() {
        return None;
    }
    Some(json!({
        "type": "object",
        "properties": { DATA_WRAPPER: json_schema(contract) },
        "required": [DATA_WRAPPER],
    }))
}

/// Render a short human-readable description of a contract.
///
/// This is what the model reads, so it stays compact: "an integer",
/// "one of: positive, negative", "an array of integers".
#[must_use]
pub fn describe(contract: &TargetContract) -> String {
    let base = match &contract.shape {
        Shape::Text => "free text".to_string(),
        Shape::Scalar { scalar } => format!("a {}", scalar.type_name()),
        Shape::Enumeration { members } => format!("one of: {}", members.join(", ")),
        Shape::List { element } => format!("an array of {}", plural(element)),
        Shape::Record { fields } => {
            let listed: Vec<String> = fields
                .iter()
                .map(|(name, field)| {
                    let mut entry = format!("{name} ({}", field.contract.kind_name());
                    if !field.required {
                        entry.push_str(", optional");
                    }
                    entry.push(')');
                    if let Some(desc) = &field.contract.description {
                        entry.push_str(&format!(" - {desc}"));
                    }
                    entry
                })
                .collect();
            format!("an object with fields: {}", listed.join("; "))
        }
    };
    match &contract.description {
        Some(description) => format!("{base} ({description})"),
        None => base,
    }
}

/// Plural noun for a list's element contract.
fn plural(element: &TargetContract) -> String {
    match &element.shape {
        Shape::Text => "strings".to_string(),
        Shape::Scalar { scalar } => match scalar {
            ScalarKind::Boolean => "booleans".to_string(),
            ScalarKind::Integer => "integers".to_string(),
            ScalarKind::Number => "numbers".to_string(),
            ScalarKind::String => "strings".to_string(),
        },
        Shape::Enumeration { members } => format!("values, each one of: {}", members.join(", ")),
        Shape::List { .. } => "arrays".to_string(),
        Shape::Record { .. } => format!("objects, each {}", describe(element)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use typecast_ai_core::contract::RecordBuilder;

    #[test]
    fn test_scalar_schema() {
        assert_eq!(
            json_schema(&TargetContract::integer()),
            json!({"type": "integer"})
        );
    }

    #[test]
    fn test_enum_schema() {
        let contract = TargetContract::enumeration(["positive", "negative"]).unwrap();
        assert_eq!(
            json_schema(&contract),
            json!({"type": "string", "enum": ["positive", "negative"]})
        );
    }

    #[test]
    fn test_list_schema() {
        let contract = TargetContract::list(TargetContract::integer());
        assert_eq!(
            json_schema(&contract),
            json!({"type": "array", "items": {"type": "integer"}})
        );
    }

    #[test]
    fn test_record_schema_field_order_and_required() {
        let contract = RecordBuilder::new()
            .field("name", TargetContract::string().described("The name"))
            .optional_field("age", TargetContract::integer())
            .build()
            .unwrap();

        let schema = json_schema(&contract);
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["name"]["description"], "The name");
        // preserve_order is enabled, so rendered property order follows
        // declaration order.
        let keys: Vec<_> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_forced_schema_wraps_in_data() {
        let schema = forced_output_schema(&TargetContract::list(TargetContract::integer()))
            .unwrap();
        assert_eq!(schema["required"], json!(["data"]));
        assert_eq!(schema["properties"]["data"]["type"], "array");
    }

    #[test]
    fn test_forced_schema_absent_for_text() {
        assert!(forced_output_schema(&TargetContract::text()).is_none());
    }

    #[test]
    fn test_describe_list_of_integers() {
        let contract = TargetContract::list(TargetContract::integer());
        assert_eq!(describe(&contract), "an array of integers");
    }

    #[test]
    fn test_describe_enumeration() {
        let contract = TargetContract::enumeration(["positive", "negative"]).unwrap();
        assert_eq!(describe(&contract), "one of: positive, negative");
    }

    #[test]
    fn test_describe_record() {
        let contract = RecordBuilder::new()
            .field("name", TargetContract::string())
            .optional_field("age", TargetContract::integer())
            .build()
            .unwrap();
        let text = describe(&contract);
        assert!(text.contains("name (string)"));
        assert!(text.contains("age (integer, optional)"));
    }

    #[test]
    fn test_describe_includes_description() {
        let contract = TargetContract::integer().described("age in years");
        assert_eq!(describe(&contract), "an integer (age in years)");
    }
}
