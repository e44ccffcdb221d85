//! # Message Renderer
//!
//! Renders values into [`ReflectMessage`] fields. Each schema turns its
//! value into a [`Leaf`] tagged with a [`ValueKind`]; the object schema
//! checks that kind against the target field descriptor and then stores the
//! leaf through the reflective setters.
//!
//! ## Storage Rules
//!
//! | Leaf                     | Effect on the field                    |
//! |--------------------------|----------------------------------------|
//! | scalar value             | kind-keyed setter                      |
//! | message value            | sub-message replaced by the value      |
//! | optional, absent         | nothing; the field stays unset         |
//! | optional, present        | as the inner leaf                      |
//! | repeated                 | container replaced by the elements     |

use std::sync::Arc;

use jpc_core::{
    accepts, FieldDescriptor, FieldDescriptorExt, MessageDescriptor, ReflectError, ReflectMessage,
    RepeatedField, Value, ValueKind,
};

use crate::error::SchemaError;

/// A schema that can render a `T` into fields of message type `M`.
pub trait MessageSchema<T: ?Sized, M: ReflectMessage> {
    /// The kind of leaf this schema produces, independent of any value.
    fn kind(&self) -> ValueKind;

    /// Render `value`.
    ///
    /// # Errors
    ///
    /// Only nested object schemas fail, with the errors
    /// [`ObjectSchema::validate`](crate::ObjectSchema::validate) would
    /// have reported.
    fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError>;

    /// A data-free leaf of [`kind`](Self::kind), used by validation to
    /// exercise the store path without source objects.
    fn placeholder(&self) -> Leaf<M>;

    /// The message type a message-kind schema produces.
    fn message_type(&self) -> Option<&MessageDescriptor> {
        None
    }

    /// Validate any object schemas nested inside this one.
    fn validate_nested(&self) -> Result<(), SchemaError> {
        Ok(())
    }
}

macro_rules! forward_message_schema {
    ($($ptr:ty),*) => {$(
        impl<T, M, S> MessageSchema<T, M> for $ptr
        where
            T: ?Sized,
            M: ReflectMessage,
            S: MessageSchema<T, M> + ?Sized,
        {
            fn kind(&self) -> ValueKind {
                (**self).kind()
            }

            fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError> {
                (**self).to_leaf(value)
            }

            fn placeholder(&self) -> Leaf<M> {
                (**self).placeholder()
            }

            fn message_type(&self) -> Option<&MessageDescriptor> {
                (**self).message_type()
            }

            fn validate_nested(&self) -> Result<(), SchemaError> {
                (**self).validate_nested()
            }
        }
    )*};
}

// Shared schemas, e.g. a nested object schema kept in a static.
forward_message_schema!(&S, Arc<S>);

/// The message rendering of one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf<M> {
    /// A single scalar or message value.
    Value(Value<M>),
    /// An optional value. `kind` is the kind of the wrapped leaf.
    Optional {
        kind: ValueKind,
        value: Option<Box<Leaf<M>>>,
    },
    /// A homogeneous sequence. `kind` is the element kind.
    Repeated { kind: ValueKind, values: Vec<Leaf<M>> },
}

impl<M> Leaf<M> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Value(v) => ValueKind::scalar(v.scalar_kind()),
            Self::Optional { kind, .. } => ValueKind::optional_of(kind.clone()),
            Self::Repeated { kind, .. } => ValueKind::repeated_of(kind.clone()),
        }
    }

    /// Whether storing this leaf writes to the field at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Optional { value: None, .. })
    }

    pub fn into_value(self) -> Option<Value<M>> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

/// Describe a produced kind, naming the message type where one is known.
pub(crate) fn describe_kind(kind: &ValueKind, message_type: Option<&MessageDescriptor>) -> String {
    match (kind, message_type) {
        (ValueKind::RepeatedOf(inner), _) => format!("repeated {}", describe_kind(inner, message_type)),
        (ValueKind::OptionalOf(inner), _) => format!("optional {}", describe_kind(inner, message_type)),
        (ValueKind::Message, Some(nested)) => nested.full_name().to_string(),
        (other, _) => other.to_string(),
    }
}

/// Describe a field as declared, e.g. `optional sample.BarInfo`.
pub(crate) fn describe_field(field: &FieldDescriptor) -> String {
    format!("{} {}", field.declared_cardinality(), field.declared_type())
}

fn mismatch(
    field: &FieldDescriptor,
    kind: &ValueKind,
    nested: Option<&MessageDescriptor>,
) -> SchemaError {
    SchemaError::TypeMismatch {
        message: field.parent_message().full_name().to_string(),
        field: field.name().to_string(),
        declared: describe_field(field),
        produced: describe_kind(kind, nested),
    }
}

/// Check that `field` can hold a leaf of `kind` whose message type (if
/// any) is `nested`.
pub(crate) fn type_check(
    field: &FieldDescriptor,
    kind: &ValueKind,
    nested: Option<&MessageDescriptor>,
) -> Result<(), SchemaError> {
    let names_agree = match (field.nested_message(), nested) {
        (Some(declared), Some(produced)) => declared.full_name() == produced.full_name(),
        _ => true,
    };
    if accepts(field, kind) && names_agree {
        Ok(())
    } else {
        Err(mismatch(field, kind, nested))
    }
}

/// Write a type-checked leaf into `field` of `message`.
pub(crate) fn store<M: ReflectMessage>(
    message: &mut M,
    field: &FieldDescriptor,
    leaf: Leaf<M>,
) -> Result<(), ReflectError> {
    match leaf {
        Leaf::Value(value) => message.set_value(field, value),
        Leaf::Optional { value: None, .. } => Ok(()),
        Leaf::Optional {
            value: Some(inner), ..
        } => store(message, field, *inner),
        Leaf::Repeated { values, .. } => {
            // The type check admits only plain values as elements.
            message
                .mutable_repeated(field)?
                .copy_from(values.into_iter().filter_map(Leaf::into_value))
        }
    }
}

/// Type-check `leaf` against `field`, then store it.
///
/// A store the message refuses after the check passed means the message
/// and the checked descriptor disagree; it is reported as a mismatch.
pub(crate) fn render_field<M: ReflectMessage>(
    message: &mut M,
    field: &FieldDescriptor,
    leaf: Leaf<M>,
    nested: Option<&MessageDescriptor>,
) -> Result<(), SchemaError> {
    let kind = leaf.kind();
    type_check(field, &kind, nested)?;
    store(message, field, leaf).map_err(|e| {
        tracing::debug!(field = field.full_name(), error = %e, "message refused a checked value");
        mismatch(field, &kind, nested)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpc_core::{pool_from_yaml, prost_reflect, DynamicMessage};

    fn descriptors() -> (MessageDescriptor, MessageDescriptor) {
        let pool = pool_from_yaml(
            r#"
package: t
messages:
  - name: Inner
    fields:
      - { name: x, label: required, type: bool }
  - name: Outer
    fields:
      - { name: n, type: int32 }
      - { name: list, label: repeated, type: string }
      - { name: inner, type: message, type_name: Inner }
  - name: Other
    fields: []
"#,
        )
        .unwrap();
        (
            pool.get_message_by_name("t.Inner").unwrap(),
            pool.get_message_by_name("t.Outer").unwrap(),
        )
    }

    fn field(descriptor: &MessageDescriptor, name: &str) -> FieldDescriptor {
        descriptor.get_field_by_name(name).unwrap()
    }

    #[test]
    fn test_leaf_kinds() {
        let scalar: Leaf<DynamicMessage> = Leaf::Value(Value::Int32(1));
        assert_eq!(scalar.kind(), ValueKind::Int32);
        let absent: Leaf<DynamicMessage> = Leaf::Optional {
            kind: ValueKind::Int32,
            value: None,
        };
        assert_eq!(absent.kind(), ValueKind::optional_of(ValueKind::Int32));
        assert!(!absent.is_present());
        let empty: Leaf<DynamicMessage> = Leaf::Repeated {
            kind: ValueKind::String,
            values: vec![],
        };
        assert_eq!(empty.kind(), ValueKind::repeated_of(ValueKind::String));
        assert!(empty.is_present());
    }

    #[test]
    fn test_type_check_rejects_wrong_message_type() {
        let (_, outer) = descriptors();
        let other = outer.parent_pool().get_message_by_name("t.Other").unwrap();
        let err = type_check(&field(&outer, "inner"), &ValueKind::Message, Some(&other)).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                message: "t.Outer".into(),
                field: "inner".into(),
                declared: "optional t.Inner".into(),
                produced: "t.Other".into(),
            }
        );
    }

    #[test]
    fn test_type_check_describes_repeated() {
        let (_, outer) = descriptors();
        let err = type_check(
            &field(&outer, "n"),
            &ValueKind::repeated_of(ValueKind::Int32),
            None,
        )
        .unwrap_err();
        match err {
            SchemaError::TypeMismatch {
                declared, produced, ..
            } => {
                assert_eq!(declared, "optional int32");
                assert_eq!(produced, "repeated int32");
            }
            other => panic!("expected TypeMismatch, got {other}"),
        }
    }

    #[test]
    fn test_store_absent_optional_leaves_field_unset() {
        let (_, outer) = descriptors();
        let mut m = DynamicMessage::new(outer.clone());
        let n = field(&outer, "n");
        store(
            &mut m,
            &n,
            Leaf::Optional {
                kind: ValueKind::Int32,
                value: None,
            },
        )
        .unwrap();
        assert!(!m.has_field_by_name("n"));
        store(
            &mut m,
            &n,
            Leaf::Optional {
                kind: ValueKind::Int32,
                value: Some(Box::new(Leaf::Value(Value::Int32(7)))),
            },
        )
        .unwrap();
        assert_eq!(m.get_field_by_name("n").unwrap().as_i32(), Some(7));
    }

    #[test]
    fn test_store_repeated_replaces_contents() {
        let (_, outer) = descriptors();
        let mut m = DynamicMessage::new(outer.clone());
        let list = field(&outer, "list");
        let leaf = |items: &[&str]| Leaf::Repeated {
            kind: ValueKind::String,
            values: items
                .iter()
                .map(|s| Leaf::Value(Value::String(s.to_string())))
                .collect(),
        };
        store(&mut m, &list, leaf(&["a", "b", "c"])).unwrap();
        store(&mut m, &list, leaf(&["d"])).unwrap();
        assert_eq!(
            m.get_field_by_name("list").unwrap().as_list(),
            Some(&[prost_reflect::Value::String("d".into())][..])
        );
    }

    #[test]
    fn test_store_message_copies_sub_message() {
        let (inner, outer) = descriptors();
        let mut sub = DynamicMessage::new(inner.clone());
        sub.set_bool(&field(&inner, "x"), true).unwrap();
        let mut m = DynamicMessage::new(outer.clone());
        store(&mut m, &field(&outer, "inner"), Leaf::Value(Value::Message(sub.clone()))).unwrap();
        assert_eq!(m.get_field_by_name("inner").unwrap().as_message(), Some(&sub));
    }

    #[test]
    fn test_render_field_reports_refused_store_as_mismatch() {
        let (inner, outer) = descriptors();
        let mut m = DynamicMessage::new(inner.clone());
        let err = render_field(
            &mut m,
            &field(&outer, "n"),
            Leaf::Value(Value::Int32(1)),
            None,
        )
        .unwrap_err();
        assert_eq!(err.message_type(), "t.Outer");
        assert_eq!(err.field(), "n");
        assert!(!m.has_field_by_name("x"));
    }
}
