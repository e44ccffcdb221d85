//! # Reflective Message Capability
//!
//! The narrow interface a structured-message system must offer so that
//! object schemas can write into it: field lookup by name (through the
//! message's descriptor), kind-keyed scalar setters, mutable access to
//! nested messages, and mutable access to repeated containers.
//!
//! Fields are addressed by `prost-reflect` descriptors; the storage behind
//! them is up to the implementation. The schema engine never touches a
//! message through anything else. [`prost_reflect::DynamicMessage`]
//! implements [`ReflectMessage`] in [`dynamic`](crate::dynamic).
//!
//! ## Contract
//!
//! Callers type-check before writing, so setters see a field of the
//! message's own descriptor whose kind matches the setter. Implementations
//! still refuse anything else with a [`ReflectError`] rather than storing
//! a value the field cannot hold.

use std::fmt;

use prost_reflect::{FieldDescriptor, Kind, MessageDescriptor};

use crate::error::ReflectError;
use crate::kind::ScalarKind;

/// One value stored in a message field, or one element of a repeated field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<M> {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Double(f64),
    Float(f32),
    String(String),
    /// Enum values travel as their number.
    Enum(i32),
    Message(M),
}

impl<M> Value<M> {
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int32(_) => ScalarKind::Int32,
            Self::Int64(_) => ScalarKind::Int64,
            Self::UInt32(_) => ScalarKind::UInt32,
            Self::UInt64(_) => ScalarKind::UInt64,
            Self::Double(_) => ScalarKind::Double,
            Self::Float(_) => ScalarKind::Float,
            Self::String(_) => ScalarKind::String,
            Self::Enum(_) => ScalarKind::Enum,
            Self::Message(_) => ScalarKind::Message,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer kind (including enum numbers) widened to `i128`.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Int32(v) | Self::Enum(v) => Some(i128::from(*v)),
            Self::Int64(v) => Some(i128::from(*v)),
            Self::UInt32(v) => Some(i128::from(*v)),
            Self::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// `Double` or `Float` widened to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Float(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&M> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Mutable access to the container behind a repeated field.
pub trait RepeatedField<M> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Append one element.
    ///
    /// # Errors
    ///
    /// [`ReflectError::InvalidValue`] for an element of the wrong kind;
    /// the container is left as it was.
    fn push(&mut self, value: Value<M>) -> Result<(), ReflectError>;

    /// Replace the contents with `values`.
    fn copy_from(
        &mut self,
        values: impl IntoIterator<Item = Value<M>>,
    ) -> Result<(), ReflectError>
    where
        Self: Sized,
    {
        self.clear();
        values.into_iter().try_for_each(|value| self.push(value))
    }
}

/// A message whose fields are addressed through its descriptor.
///
/// Instances are independent: constructing, filling and dropping one never
/// affects another, so renders on different threads need no coordination.
pub trait ReflectMessage: Clone + fmt::Debug + Send + Sync + Sized + 'static {
    /// The view [`mutable_repeated`](Self::mutable_repeated) hands out.
    type Repeated<'a>: RepeatedField<Self>
    where
        Self: 'a;

    /// A fresh instance of the message type described by `descriptor`,
    /// with every field unset.
    fn new(descriptor: &MessageDescriptor) -> Self;

    fn descriptor(&self) -> MessageDescriptor;

    fn set_bool(&mut self, field: &FieldDescriptor, value: bool) -> Result<(), ReflectError>;
    fn set_int32(&mut self, field: &FieldDescriptor, value: i32) -> Result<(), ReflectError>;
    fn set_int64(&mut self, field: &FieldDescriptor, value: i64) -> Result<(), ReflectError>;
    fn set_uint32(&mut self, field: &FieldDescriptor, value: u32) -> Result<(), ReflectError>;
    fn set_uint64(&mut self, field: &FieldDescriptor, value: u64) -> Result<(), ReflectError>;
    fn set_double(&mut self, field: &FieldDescriptor, value: f64) -> Result<(), ReflectError>;
    fn set_float(&mut self, field: &FieldDescriptor, value: f32) -> Result<(), ReflectError>;
    fn set_string(&mut self, field: &FieldDescriptor, value: String) -> Result<(), ReflectError>;
    fn set_enum(&mut self, field: &FieldDescriptor, number: i32) -> Result<(), ReflectError>;

    /// The sub-message of a singular message field, created unset if the
    /// field is not yet set. The field counts as set afterwards.
    fn mutable_message(&mut self, field: &FieldDescriptor) -> Result<&mut Self, ReflectError>;

    /// The container of a repeated field.
    fn mutable_repeated(
        &mut self,
        field: &FieldDescriptor,
    ) -> Result<Self::Repeated<'_>, ReflectError>;

    /// Whether a singular field is set, or a repeated field is non-empty.
    fn has_field(&self, field: &FieldDescriptor) -> bool;

    fn clear_field(&mut self, field: &FieldDescriptor);

    fn find_field_by_name(&self, name: &str) -> Option<FieldDescriptor> {
        self.descriptor().get_field_by_name(name)
    }

    /// Store `value` in a singular field through the setter for its kind.
    /// Message values replace the sub-message wholesale.
    fn set_value(&mut self, field: &FieldDescriptor, value: Value<Self>) -> Result<(), ReflectError> {
        match value {
            Value::Bool(v) => self.set_bool(field, v),
            Value::Int32(v) => self.set_int32(field, v),
            Value::Int64(v) => self.set_int64(field, v),
            Value::UInt32(v) => self.set_uint32(field, v),
            Value::UInt64(v) => self.set_uint64(field, v),
            Value::Double(v) => self.set_double(field, v),
            Value::Float(v) => self.set_float(field, v),
            Value::String(v) => self.set_string(field, v),
            Value::Enum(v) => self.set_enum(field, v),
            Value::Message(m) => {
                let fits = matches!(field.kind(), Kind::Message(expected) if expected == m.descriptor());
                if !fits {
                    return Err(ReflectError::InvalidValue {
                        field: field.full_name().to_string(),
                        value: m.descriptor().full_name().to_string(),
                    });
                }
                *self.mutable_message(field)? = m;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type V = Value<()>;

    #[test]
    fn test_scalar_kinds() {
        assert_eq!(V::Bool(false).scalar_kind(), ScalarKind::Bool);
        assert_eq!(V::UInt64(0).scalar_kind(), ScalarKind::UInt64);
        assert_eq!(V::Enum(3).scalar_kind(), ScalarKind::Enum);
        assert_eq!(Value::Message(()).scalar_kind(), ScalarKind::Message);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(V::Int32(-4).as_integer(), Some(-4));
        assert_eq!(V::UInt64(u64::MAX).as_integer(), Some(i128::from(u64::MAX)));
        assert_eq!(V::Enum(2).as_integer(), Some(2));
        assert_eq!(V::Float(1.5).as_float(), Some(1.5));
        assert_eq!(V::String("a".into()).as_str(), Some("a"));
        assert_eq!(V::Bool(true).as_str(), None);
        assert_eq!(V::Bool(true).as_bool(), Some(true));
    }

    /// A `Vec` standing in for a repeated container that only takes ints.
    struct Ints(Vec<i32>);

    impl RepeatedField<()> for Ints {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn clear(&mut self) {
            self.0.clear();
        }

        fn push(&mut self, value: V) -> Result<(), ReflectError> {
            match value {
                Value::Int32(v) => {
                    self.0.push(v);
                    Ok(())
                }
                other => Err(ReflectError::InvalidValue {
                    field: "t.Ints.values".into(),
                    value: other.scalar_kind().to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_copy_from_replaces() {
        let mut r = Ints(vec![9]);
        r.copy_from(vec![Value::Int32(1), Value::Int32(2)]).unwrap();
        assert_eq!(r.0, vec![1, 2]);
        assert!(!r.is_empty());
    }

    #[test]
    fn test_copy_from_stops_at_bad_element() {
        let mut r = Ints(vec![]);
        let err = r
            .copy_from(vec![Value::Int32(1), Value::Bool(true), Value::Int32(2)])
            .unwrap_err();
        assert_eq!(
            err,
            ReflectError::InvalidValue {
                field: "t.Ints.values".into(),
                value: "bool".into(),
            }
        );
        assert_eq!(r.0, vec![1]);
    }
}
