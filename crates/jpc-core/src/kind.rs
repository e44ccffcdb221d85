//! # Value Kinds — The Type-Check Vocabulary
//!
//! Every schema produces a value of some [`ValueKind`], and every field
//! descriptor declares a [`Cardinality`] plus a [`ScalarKind`]. Validation
//! is the comparison of the two, done at runtime with [`accepts`].
//!
//! ## Acceptance Rules
//!
//! | Produced kind      | Field must be                         |
//! |--------------------|---------------------------------------|
//! | `K` (scalar)       | required or optional, element kind `K` |
//! | `optional K`       | optional, element kind `K`             |
//! | `repeated K`       | repeated, element kind `K`             |
//! | anything deeper    | never accepted                        |
//!
//! Message-kind fields additionally compare the nested message type name;
//! that check lives with the caller because kinds carry no type names.

use std::fmt;

use prost_reflect::{FieldDescriptor, Kind};
use serde::{Deserialize, Serialize};

/// Element kind of a field, as far as validation distinguishes them.
///
/// Protobuf's wire-level integer encodings collapse onto their value type:
/// `sint32` and `sfixed32` are `Int32`, `fixed64` is `UInt64`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Double,
    Float,
    String,
    Enum,
    Message,
}

impl ScalarKind {
    /// All scalar kinds in declaration order.
    pub fn all() -> &'static [ScalarKind] {
        &[
            Self::Bool,
            Self::Int32,
            Self::Int64,
            Self::UInt32,
            Self::UInt64,
            Self::Double,
            Self::Float,
            Self::String,
            Self::Enum,
            Self::Message,
        ]
    }

    /// The kind a protobuf field kind stores. `None` for `bytes`, which no
    /// schema produces.
    pub fn of(kind: &Kind) -> Option<Self> {
        Some(match kind {
            Kind::Bool => Self::Bool,
            Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Self::Int32,
            Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => Self::Int64,
            Kind::Uint32 | Kind::Fixed32 => Self::UInt32,
            Kind::Uint64 | Kind::Fixed64 => Self::UInt64,
            Kind::Double => Self::Double,
            Kind::Float => Self::Float,
            Kind::String => Self::String,
            Kind::Enum(_) => Self::Enum,
            Kind::Message(_) => Self::Message,
            Kind::Bytes => return None,
        })
    }

    /// The lowercase name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Double => "double",
            Self::Float => "float",
            Self::String => "string",
            Self::Enum => "enum",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    Required,
    Optional,
    Repeated,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::Repeated => "repeated",
        }
    }
}

impl From<prost_reflect::Cardinality> for Cardinality {
    fn from(cardinality: prost_reflect::Cardinality) -> Self {
        match cardinality {
            prost_reflect::Cardinality::Required => Self::Required,
            prost_reflect::Cardinality::Optional => Self::Optional,
            prost_reflect::Cardinality::Repeated => Self::Repeated,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of value a schema produces for the message renderer.
///
/// A closed set: the ten scalar kinds plus the two wrappers. Wrappers nest
/// freely so that any schema composition has a kind, but only one level of
/// wrapping around a scalar can ever be stored in a message field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Double,
    Float,
    String,
    Enum,
    Message,
    RepeatedOf(Box<ValueKind>),
    OptionalOf(Box<ValueKind>),
}

impl ValueKind {
    /// Lift a scalar kind.
    pub fn scalar(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Bool => Self::Bool,
            ScalarKind::Int32 => Self::Int32,
            ScalarKind::Int64 => Self::Int64,
            ScalarKind::UInt32 => Self::UInt32,
            ScalarKind::UInt64 => Self::UInt64,
            ScalarKind::Double => Self::Double,
            ScalarKind::Float => Self::Float,
            ScalarKind::String => Self::String,
            ScalarKind::Enum => Self::Enum,
            ScalarKind::Message => Self::Message,
        }
    }

    /// `repeated <inner>`.
    pub fn repeated_of(inner: ValueKind) -> Self {
        Self::RepeatedOf(Box::new(inner))
    }

    /// `optional <inner>`.
    pub fn optional_of(inner: ValueKind) -> Self {
        Self::OptionalOf(Box::new(inner))
    }

    /// The scalar kind if this kind is not wrapped.
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::RepeatedOf(_) | Self::OptionalOf(_) => None,
            scalar => Some(scalar.element()),
        }
    }

    /// The innermost scalar kind beneath any wrappers.
    pub fn element(&self) -> ScalarKind {
        match self {
            Self::Bool => ScalarKind::Bool,
            Self::Int32 => ScalarKind::Int32,
            Self::Int64 => ScalarKind::Int64,
            Self::UInt32 => ScalarKind::UInt32,
            Self::UInt64 => ScalarKind::UInt64,
            Self::Double => ScalarKind::Double,
            Self::Float => ScalarKind::Float,
            Self::String => ScalarKind::String,
            Self::Enum => ScalarKind::Enum,
            Self::Message => ScalarKind::Message,
            Self::RepeatedOf(inner) | Self::OptionalOf(inner) => inner.element(),
        }
    }

    /// The kind a field with this shape stores, as a schema would produce
    /// it. `None` for map and `bytes` fields.
    pub fn of_field(field: &FieldDescriptor) -> Option<Self> {
        if field.is_map() {
            return None;
        }
        let scalar = Self::scalar(ScalarKind::of(&field.kind())?);
        Some(match Cardinality::from(field.cardinality()) {
            Cardinality::Required => scalar,
            Cardinality::Optional => Self::optional_of(scalar),
            Cardinality::Repeated => Self::repeated_of(scalar),
        })
    }
}

impl From<ScalarKind> for ValueKind {
    fn from(kind: ScalarKind) -> Self {
        Self::scalar(kind)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepeatedOf(inner) => write!(f, "repeated {inner}"),
            Self::OptionalOf(inner) => write!(f, "optional {inner}"),
            other => f.write_str(other.element().as_str()),
        }
    }
}

/// Whether `field` can store a value of kind `produced`.
///
/// Map and `bytes` fields accept nothing.
pub fn accepts(field: &FieldDescriptor, produced: &ValueKind) -> bool {
    if field.is_map() {
        return false;
    }
    let Some(element) = ScalarKind::of(&field.kind()) else {
        return false;
    };
    let cardinality = Cardinality::from(field.cardinality());
    let (cardinality_ok, inner) = match produced {
        ValueKind::OptionalOf(inner) => (cardinality == Cardinality::Optional, inner.as_ref()),
        ValueKind::RepeatedOf(inner) => (cardinality == Cardinality::Repeated, inner.as_ref()),
        scalar => (
            matches!(cardinality, Cardinality::Required | Cardinality::Optional),
            scalar,
        ),
    };
    cardinality_ok && inner.as_scalar() == Some(element)
}
