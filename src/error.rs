//! Structural errors.
//!
//! Only schema-level problems surface as errors. Value-shape mismatches inside the
//! coercion engine never do; they become a [`crate::diagnostics::Diagnostic`].
use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("schema `{schema}`: expected an object, found {found}")]
    NotAnObject { schema: String, found: &'static str },

    #[error("schema `{schema}`: missing required field `{field}`")]
    MissingField { schema: String, field: String },

    #[error("schema `{schema}`: field `{field}`: {source}")]
    Field {
        schema: String,
        field: String,
        source: Box<DecodeError>,
    },

    #[error("at `{key}`: {source}")]
    At { key: String, source: Box<DecodeError> },

    #[error("expected {expected}, found {found}")]
    Type { expected: &'static str, found: String },

    #[error("{value} is outside of [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("unknown {kind} type `{discriminator}`")]
    UnknownVariant {
        kind: &'static str,
        discriminator: String,
    },

    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

impl DecodeError {
    pub fn expected(expected: &'static str, found: &Value) -> Self {
        DecodeError::Type {
            expected,
            found: found.to_string(),
        }
    }

    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::Invalid {
            kind,
            reason: reason.into(),
        }
    }

    /// Prefix the error with the key (or index) it was found under.
    pub fn at(self, key: impl Into<String>) -> Self {
        DecodeError::At {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// The field a schema-level error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::MissingField { field, .. } | DecodeError::Field { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("schema `{schema}`: missing required field `{field}`")]
    MissingField { schema: String, field: String },

    #[error("schema `{schema}`: field `{field}`: {source}")]
    Field {
        schema: String,
        field: String,
        source: Box<EncodeError>,
    },

    #[error("expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    #[error("no schema registered for type `{0}`")]
    UnknownVariant(String),

    #[error("invalid {kind}: {reason}")]
    Invalid { kind: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_errors_render_their_path() {
        let err = DecodeError::expected("number", &Value::from("abc"))
            .at("min")
            .at("value");
        assert_eq!(
            err.to_string(),
            r#"at `value`: at `min`: expected number, found "abc""#
        );
    }

    #[test]
    fn field_name_is_exposed_for_schema_errors() {
        let err = DecodeError::MissingField {
            schema: "spire".into(),
            field: "n".into(),
        };
        assert_eq!(err.field(), Some("n"));
        assert_eq!(DecodeError::invalid("x", "y").field(), None);
    }
}
