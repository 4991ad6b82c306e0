//! Output contract declaration.
//!
//! A [`TargetContract`] is the declared shape a call's output must satisfy.
//! Contracts are built explicitly through constructors and [`RecordBuilder`],
//! never inferred: an invalid declaration is rejected at construction time
//! with a [`ContractError`], before anything touches the network.
//!
//! # Example
//!
//! ```rust
//! use typecast_ai_core::contract::{RecordBuilder, TargetContract};
//!
//! let contract = RecordBuilder::new()
//!     .field("name", TargetContract::string().described("The person's name"))
//!     .field("age", TargetContract::integer().described("Age in years"))
//!     .optional_field("nickname", TargetContract::string())
//!     .described("A person")
//!     .build()
//!     .unwrap();
//!
//! assert!(contract.is_constrained());
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::ContractError;

/// Scalar value kinds a contract can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// A boolean value.
    Boolean,
    /// An integer value. Floats with a fractional part do not satisfy it.
    Integer,
    /// A floating-point number. Integral values satisfy it.
    Number,
    /// A string value (constrained mode, unlike [`Shape::Text`]).
    String,
}

impl ScalarKind {
    /// JSON-schema type name for this scalar.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

/// A named field inside a record contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// The nested contract this field's value must satisfy.
    pub contract: TargetContract,
    /// Whether the field must be present in the reply.
    pub required: bool,
}

/// The structural shape of a [`TargetContract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Unconstrained free text. No forced-output schema is attached and the
    /// reply is returned verbatim without validation.
    Text,
    /// A single scalar value.
    Scalar {
        /// The scalar kind.
        scalar: ScalarKind,
    },
    /// Exactly one of a fixed, ordered set of string members.
    Enumeration {
        /// The declared members, in declaration order.
        members: Vec<String>,
    },
    /// An ordered list whose elements all satisfy one element contract.
    List {
        /// The element contract.
        element: Box<TargetContract>,
    },
    /// A structured record with a fixed, ordered field set.
    Record {
        /// Fields in declaration order. Order is part of the contract: it
        /// controls how the schema is rendered to the model.
        fields: IndexMap<String, Field>,
    },
}

/// The declared shape a call's output must satisfy.
///
/// Built once per declaration, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetContract {
    /// The structural shape.
    pub shape: Shape,
    /// Optional human-readable description, rendered into the schema and
    /// the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TargetContract {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            description: None,
        }
    }

    /// Unconstrained free text (constraint = none).
    #[must_use]
    pub fn text() -> Self {
        Self::with_shape(Shape::Text)
    }

    /// A boolean scalar.
    #[must_use]
    pub fn boolean() -> Self {
        Self::with_shape(Shape::Scalar {
            scalar: ScalarKind::Boolean,
        })
    }

    /// An integer scalar.
    #[must_use]
    pub fn integer() -> Self {
        Self::with_shape(Shape::Scalar {
            scalar: ScalarKind::Integer,
        })
    }

    /// A number scalar.
    #[must_use]
    pub fn number() -> Self {
        Self::with_shape(Shape::Scalar {
            scalar: ScalarKind::Number,
        })
    }

    /// A string scalar (schema-constrained, unlike [`TargetContract::text`]).
    #[must_use]
    pub fn string() -> Self {
        Self::with_shape(Shape::Scalar {
            scalar: ScalarKind::String,
        })
    }

    /// An enumeration over the given members.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::EmptyEnumeration`] when no members are given
    /// and [`ContractError::DuplicateMember`] when a member repeats.
    pub fn enumeration<I, S>(members: I) -> Result<Self, ContractError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(ContractError::EmptyEnumeration);
        }
        let mut seen = std::collections::HashSet::new();
        for member in &members {
            if !seen.insert(member.as_str()) {
                return Err(ContractError::duplicate_member(member));
            }
        }
        Ok(Self::with_shape(Shape::Enumeration { members }))
    }

    /// A list of elements satisfying `element`.
    #[must_use]
    pub fn list(element: TargetContract) -> Self {
        Self::with_shape(Shape::List {
            element: Box::new(element),
        })
    }

    /// Attach a description. Descriptions are allowed at any nesting level.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this contract forces a structured output schema.
    ///
    /// Only [`Shape::Text`] is unconstrained.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        !matches!(self.shape, Shape::Text)
    }

    /// Short name of the contract kind, for error messages.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match &self.shape {
            Shape::Text => "text",
            Shape::Scalar { scalar } => scalar.type_name(),
            Shape::Enumeration { .. } => "enumeration",
            Shape::List { .. } => "list",
            Shape::Record { .. } => "record",
        }
    }

    /// Enumeration members, when this is an enumeration contract.
    #[must_use]
    pub fn members(&self) -> Option<&[String]> {
        match &self.shape {
            Shape::Enumeration { members } => Some(members),
            _ => None,
        }
    }
}

/// Builder for record contracts.
///
/// Field order is preserved exactly as declared.
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    fields: Vec<(String, Field)>,
    description: Option<String>,
}

impl RecordBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, contract: TargetContract) -> Self {
        self.fields.push((
            name.into(),
            Field {
                contract,
                required: true,
            },
        ));
        self
    }

    /// Add an optional field.
    #[must_use]
    pub fn optional_field(mut self, name: impl Into<String>, contract: TargetContract) -> Self {
        self.fields.push((
            name.into(),
            Field {
                contract,
                required: false,
            },
        ));
        self
    }

    /// Set the record description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the record contract.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`] for an empty record, an empty field name,
    /// or a duplicate field name.
    pub fn build(self) -> Result<TargetContract, ContractError> {
        if self.fields.is_empty() {
            return Err(ContractError::EmptyRecord);
        }
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (name, field) in self.fields {
            if name.is_empty() {
                return Err(ContractError::EmptyFieldName);
            }
            if fields.insert(name.clone(), field).is_some() {
                return Err(ContractError::duplicate_field(name));
            }
        }
        Ok(TargetContract {
            shape: Shape::Record { fields },
            description: self.description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(ScalarKind::Boolean, "boolean")]
    #[case(ScalarKind::Integer, "integer")]
    #[case(ScalarKind::Number, "number")]
    #[case(ScalarKind::String, "string")]
    fn test_scalar_type_names(#[case] kind: ScalarKind, #[case] name: &str) {
        assert_eq!(kind.type_name(), name);
    }

    #[test]
    fn test_text_is_unconstrained() {
        assert!(!TargetContract::text().is_constrained());
        assert!(TargetContract::string().is_constrained());
        assert!(TargetContract::integer().is_constrained());
    }

    #[test]
    fn test_enumeration_preserves_order() {
        let contract = TargetContract::enumeration(["positive", "negative", "neutral"]).unwrap();
        assert_eq!(
            contract.members().unwrap(),
            &["positive", "negative", "neutral"]
        );
    }

    #[test]
    fn test_enumeration_empty_rejected() {
        let err = TargetContract::enumeration(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ContractError::EmptyEnumeration));
    }

    #[test]
    fn test_enumeration_duplicate_rejected() {
        let err = TargetContract::enumeration(["a", "b", "a"]).unwrap_err();
        assert!(matches!(err, ContractError::DuplicateMember(m) if m == "a"));
    }

    #[test]
    fn test_record_preserves_field_order() {
        let contract = RecordBuilder::new()
            .field("zeta", TargetContract::string())
            .field("alpha", TargetContract::integer())
            .field("mid", TargetContract::boolean())
            .build()
            .unwrap();

        match &contract.shape {
            Shape::Record { fields } => {
                let names: Vec<_> = fields.keys().cloned().collect();
                assert_eq!(names, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_record_empty_rejected() {
        let err = RecordBuilder::new().build().unwrap_err();
        assert!(matches!(err, ContractError::EmptyRecord));
    }

    #[test]
    fn test_record_duplicate_field_rejected() {
        let err = RecordBuilder::new()
            .field("name", TargetContract::string())
            .field("name", TargetContract::integer())
            .build()
            .unwrap_err();
        assert!(matches!(err, ContractError::DuplicateField(f) if f == "name"));
    }

    #[test]
    fn test_record_empty_field_name_rejected() {
        let err = RecordBuilder::new()
            .field("", TargetContract::string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ContractError::EmptyFieldName));
    }

    #[test]
    fn test_described_at_every_level() {
        let contract = RecordBuilder::new()
            .field(
                "tags",
                TargetContract::list(TargetContract::string().described("a tag"))
                    .described("all tags"),
            )
            .described("tagged thing")
            .build()
            .unwrap();

        assert_eq!(contract.description.as_deref(), Some("tagged thing"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let contract = RecordBuilder::new()
            .field("score", TargetContract::number())
            .optional_field("label", TargetContract::enumeration(["a", "b"]).unwrap())
            .build()
            .unwrap();

        let json = serde_json::to_string(&contract).unwrap();
        let parsed: TargetContract = serde_json::from_str(&json).unwrap();
        assert_eq!(contract, parsed);
    }
}
