//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Errors name the message type and field involved so a
//! broken descriptor file or a refused write can be traced without a
//! debugger.

use std::path::PathBuf;

use thiserror::Error;

/// A descriptor file could not be turned into a descriptor pool.
#[derive(Error, Debug)]
pub enum DescriptorFileError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Io {
        /// Path of the descriptor file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for the descriptor format.
    #[error("invalid YAML descriptor file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file is not valid JSON for the descriptor format.
    #[error("invalid JSON descriptor file: {0}")]
    Json(#[from] serde_json::Error),

    /// A message, enum or package name that is not a protobuf identifier.
    #[error("'{0}' is not a valid name")]
    InvalidName(String),

    /// A `message` or `enum` field without a `type_name`.
    #[error("{kind} field '{field}' of message '{message}' has no type_name")]
    MissingTypeName {
        /// Name of the message as written in the file.
        message: String,
        /// The offending field.
        field: String,
        /// `message` or `enum`.
        kind: &'static str,
    },

    /// A scalar field with a `type_name`.
    #[error("field '{field}' of message '{message}' is scalar but has a type_name")]
    UnexpectedTypeName {
        /// Name of the message as written in the file.
        message: String,
        /// The offending field.
        field: String,
    },

    /// The descriptors are malformed: duplicate names or numbers, unknown
    /// type references, or an undecodable descriptor set.
    #[error(transparent)]
    Descriptor(#[from] prost_reflect::DescriptorError),
}

/// A reflective write the target message refused.
///
/// The schema engine type-checks every write first, so these surface only
/// when the checked descriptor and the message disagree, for example two
/// pools that both declare a message of the same name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// The field descriptor belongs to another message type.
    #[error("field '{field}' is not a field of message '{message}'")]
    ForeignField {
        /// Full name of the message written to.
        message: String,
        /// Full name of the field.
        field: String,
    },

    /// The value does not fit the field.
    #[error("field '{field}' cannot hold a {value} value")]
    InvalidValue {
        /// Full name of the field.
        field: String,
        /// Kind of the refused value, e.g. `string` or `sample.BarInfo`.
        value: String,
    },
}
