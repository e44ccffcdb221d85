//! # Optional Schema
//!
//! [`Optional`] renders a value that may be absent. Absent values render as
//! `null` and leave the message field unset; present values render exactly
//! as the inner schema would.

use std::fmt;

use jpc_core::{MessageDescriptor, ReflectMessage, ValueKind};

use crate::error::SchemaError;
use crate::message::{Leaf, MessageSchema};
use crate::text::TextSchema;

/// A slot that may or may not hold an `Inner`.
pub trait Presence {
    type Inner: ?Sized;

    fn present(&self) -> Option<&Self::Inner>;
}

impl<T> Presence for Option<T> {
    type Inner = T;

    fn present(&self) -> Option<&T> {
        self.as_ref()
    }
}

impl<P: Presence + ?Sized> Presence for &P {
    type Inner = P::Inner;

    fn present(&self) -> Option<&P::Inner> {
        (**self).present()
    }
}

impl<P: Presence + ?Sized> Presence for Box<P> {
    type Inner = P::Inner;

    fn present(&self) -> Option<&P::Inner> {
        (**self).present()
    }
}

/// Schema for optional values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Optional<S> {
    inner: S,
}

impl<S> Optional<S> {
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

pub fn optional<S>(inner: S) -> Optional<S> {
    Optional { inner }
}

impl<P, S> TextSchema<P> for Optional<S>
where
    P: Presence + ?Sized,
    S: TextSchema<P::Inner>,
{
    fn write_text(&self, value: &P, out: &mut dyn fmt::Write) -> fmt::Result {
        match value.present() {
            Some(inner) => self.inner.write_text(inner, out),
            None => out.write_str("null"),
        }
    }
}

impl<P, S, M> MessageSchema<P, M> for Optional<S>
where
    P: Presence + ?Sized,
    S: MessageSchema<P::Inner, M>,
    M: ReflectMessage,
{
    fn kind(&self) -> ValueKind {
        ValueKind::optional_of(self.inner.kind())
    }

    fn to_leaf(&self, value: &P) -> Result<Leaf<M>, SchemaError> {
        let value = match value.present() {
            Some(inner) => Some(Box::new(self.inner.to_leaf(inner)?)),
            None => None,
        };
        Ok(Leaf::Optional {
            kind: self.inner.kind(),
            value,
        })
    }

    /// An absent value: validation proves the wiring without writing.
    fn placeholder(&self) -> Leaf<M> {
        Leaf::Optional {
            kind: self.inner.kind(),
            value: None,
        }
    }

    fn message_type(&self) -> Option<&MessageDescriptor> {
        self.inner.message_type()
    }

    fn validate_nested(&self) -> Result<(), SchemaError> {
        self.inner.validate_nested()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{array, boolean, number, string};
    use jpc_core::{DynamicMessage, Value};

    #[test]
    fn test_absent_renders_null() {
        assert_eq!(optional(string()).to_text_string(&None::<String>).unwrap(), "null");
        assert_eq!(optional(number()).to_text_string(&None::<Box<i32>>).unwrap(), "null");
    }

    #[test]
    fn test_present_renders_inner() {
        assert_eq!(optional(number()).to_text_string(&Some(Box::new(707))).unwrap(), "707");
        assert_eq!(optional(boolean()).to_text_string(&Some(false)).unwrap(), "false");
        assert_eq!(
            optional(array(number())).to_text_string(&Some(vec![1, 2])).unwrap(),
            "[1,2]"
        );
    }

    #[test]
    fn test_borrowed_and_boxed_slots() {
        let slot = Some(5u64);
        assert_eq!(optional(number()).to_text_string(&&slot).unwrap(), "5");
        let boxed: Box<Option<&str>> = Box::new(Some("in"));
        assert_eq!(optional(string()).to_text_string(&boxed).unwrap(), r#""in""#);
    }

    #[test]
    fn test_leaf() {
        let present: Leaf<DynamicMessage> = optional(number()).to_leaf(&Some(3i32)).unwrap();
        assert_eq!(
            present,
            Leaf::Optional {
                kind: ValueKind::Int32,
                value: Some(Box::new(Leaf::Value(Value::Int32(3)))),
            }
        );
        let absent: Leaf<DynamicMessage> = optional(number()).to_leaf(&None::<i32>).unwrap();
        assert!(!absent.is_present());
        assert_eq!(absent.kind(), ValueKind::optional_of(ValueKind::Int32));
    }

    #[test]
    fn test_placeholder_is_absent() {
        let leaf: Leaf<DynamicMessage> =
            MessageSchema::<Option<String>, _>::placeholder(&optional(string()));
        assert!(!leaf.is_present());
        assert_eq!(leaf.kind(), ValueKind::optional_of(ValueKind::String));
    }
}
