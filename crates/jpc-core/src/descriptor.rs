//! # Descriptor Views
//!
//! Message and field descriptors are `prost-reflect`'s. This module reads
//! them in the terms the schema engine and the CLI listing use: a
//! [`Cardinality`], a [`ScalarKind`], the nested message type and the type
//! as a `.proto` file would spell it.
//!
//! ```
//! use jpc_core::{pool_from_yaml, Cardinality, FieldDescriptorExt};
//!
//! let pool = pool_from_yaml(
//!     r#"
//! package: sample
//! messages:
//!   - name: BarInfo
//!     fields:
//!       - { name: x, label: required, type: bool }
//!       - { name: y, type: int64 }
//! "#,
//! )
//! .unwrap();
//! let bar = pool.get_message_by_name("sample.BarInfo").unwrap();
//! let y = bar.get_field_by_name("y").unwrap();
//! assert_eq!(y.number(), 2);
//! assert_eq!(y.declared_cardinality(), Cardinality::Optional);
//! assert_eq!(y.declared_type(), "int64");
//! ```

use prost_reflect::{FieldDescriptor, Kind, MessageDescriptor};

use crate::kind::{Cardinality, ScalarKind};

/// Read-only views of a [`FieldDescriptor`].
pub trait FieldDescriptorExt {
    fn declared_cardinality(&self) -> Cardinality;

    /// Element kind, `None` for `bytes`.
    fn scalar_kind(&self) -> Option<ScalarKind>;

    /// The nested descriptor of a message-kind field.
    fn nested_message(&self) -> Option<MessageDescriptor>;

    /// Type as written in descriptor listings, e.g. `sint32` or
    /// `sample.BarInfo`.
    fn declared_type(&self) -> String;
}

impl FieldDescriptorExt for FieldDescriptor {
    fn declared_cardinality(&self) -> Cardinality {
        Cardinality::from(self.cardinality())
    }

    fn scalar_kind(&self) -> Option<ScalarKind> {
        ScalarKind::of(&self.kind())
    }

    fn nested_message(&self) -> Option<MessageDescriptor> {
        match self.kind() {
            Kind::Message(nested) => Some(nested),
            _ => None,
        }
    }

    fn declared_type(&self) -> String {
        let name = match self.kind() {
            Kind::Message(nested) => return nested.full_name().to_string(),
            Kind::Enum(nested) => return nested.full_name().to_string(),
            Kind::Double => "double",
            Kind::Float => "float",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Sint32 => "sint32",
            Kind::Sint64 => "sint64",
            Kind::Fixed32 => "fixed32",
            Kind::Fixed64 => "fixed64",
            Kind::Sfixed32 => "sfixed32",
            Kind::Sfixed64 => "sfixed64",
            Kind::Bool => "bool",
            Kind::String => "string",
            Kind::Bytes => "bytes",
        };
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::pool_from_yaml;

    fn outer() -> MessageDescriptor {
        let pool = pool_from_yaml(
            r#"
package: t
enums:
  - name: Colour
    values: [{ name: RED, number: 1 }]
messages:
  - name: Inner
    fields:
      - { name: x, label: required, type: bool }
  - name: Outer
    fields:
      - { name: inner, type: message, type_name: Inner }
      - { name: tags, label: repeated, type: string }
      - { name: colour, type: enum, type_name: t.Colour }
      - { name: count, number: 9, type: fixed32 }
"#,
        )
        .unwrap();
        pool.get_message_by_name("t.Outer").unwrap()
    }

    #[test]
    fn test_message_field_names_nested_type() {
        let inner = outer().get_field_by_name("inner").unwrap();
        assert_eq!(inner.scalar_kind(), Some(ScalarKind::Message));
        assert_eq!(inner.declared_type(), "t.Inner");
        assert_eq!(inner.nested_message().unwrap().full_name(), "t.Inner");
        assert_eq!(inner.declared_cardinality(), Cardinality::Optional);
    }

    #[test]
    fn test_scalar_fields() {
        let outer = outer();
        let tags = outer.get_field_by_name("tags").unwrap();
        assert_eq!(tags.declared_cardinality(), Cardinality::Repeated);
        assert!(tags.nested_message().is_none());
        let count = outer.get_field_by_name("count").unwrap();
        assert_eq!(count.number(), 9);
        assert_eq!(count.declared_type(), "fixed32");
        assert_eq!(count.scalar_kind(), Some(ScalarKind::UInt32));
    }

    #[test]
    fn test_enum_field_names_enum_type() {
        let colour = outer().get_field_by_name("colour").unwrap();
        assert_eq!(colour.scalar_kind(), Some(ScalarKind::Enum));
        assert_eq!(colour.declared_type(), "t.Colour");
    }
}
