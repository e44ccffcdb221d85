//! # Schema Errors
//!
//! Both variants are configuration errors: an object schema and its target
//! message descriptor disagree. They surface from
//! [`ObjectSchema::validate`](crate::ObjectSchema::validate), normally once
//! at initialization, and should abort whatever owns the schema. Rendering
//! a validated schema never produces them.

use thiserror::Error;

/// An object schema does not fit its target message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema names a field the message type does not declare.
    #[error("message '{message}' has no field named '{field}'")]
    MissingField {
        /// Full name of the target message type.
        message: String,
        /// The field name the schema used.
        field: String,
    },

    /// The field exists but cannot hold what the schema produces.
    #[error("field '{field}' of message '{message}' is declared {declared}, but the schema produces {produced}")]
    TypeMismatch {
        /// Full name of the target message type.
        message: String,
        /// The mismatched field.
        field: String,
        /// Cardinality and type from the descriptor, e.g. `repeated int32`.
        declared: String,
        /// Kind the schema produces, e.g. `optional string`.
        produced: String,
    },
}

impl SchemaError {
    /// The field the error is about.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field, .. } | Self::TypeMismatch { field, .. } => field,
        }
    }

    /// The message type the error is about.
    pub fn message_type(&self) -> &str {
        match self {
            Self::MissingField { message, .. } | Self::TypeMismatch { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_field() {
        let err = SchemaError::MissingField {
            message: "sample.BarInfo".into(),
            field: "w".into(),
        };
        assert_eq!(err.to_string(), "message 'sample.BarInfo' has no field named 'w'");
        assert_eq!(err.field(), "w");
        assert_eq!(err.message_type(), "sample.BarInfo");
    }

    #[test]
    fn test_display_type_mismatch() {
        let err = SchemaError::TypeMismatch {
            message: "sample.FooInfo".into(),
            field: "j".into(),
            declared: "optional int32".into(),
            produced: "repeated int32".into(),
        };
        assert!(err.to_string().contains("declared optional int32"));
        assert!(err.to_string().contains("produces repeated int32"));
    }
}
