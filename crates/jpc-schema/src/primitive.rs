//! # Primitive Schemas
//!
//! [`Boolean`], [`Number`], [`Enumeration`] and [`Str`]. Each accepts a
//! family of Rust types described by a value trait, so one schema value
//! serves every field of that family:
//!
//! | Schema        | Accepts (`T`)                                   | Text              | Message kind        |
//! |---------------|-------------------------------------------------|-------------------|---------------------|
//! | `Boolean`     | [`BooleanValue`]: `bool`                        | `true` / `false`  | `bool`              |
//! | `Number`      | [`NumberValue`]: `i8`–`i64`, `u8`–`u64`, `f32`, `f64` | decimal     | per type            |
//! | `Enumeration` | [`EnumValue`]: user enums                        | the enum number   | `enum`              |
//! | `Str`         | [`StringValue`]: `String`, `str`, `Cow<str>`    | `"…"`             | `string`            |
//!
//! Every family also covers `&T` and `Box<T>` of its members, which is what
//! lets `Option<Box<i32>>` or a projected `&String` flow through unchanged.
//! `i8`/`i16` widen to `int32` and `u8`/`u16` to `uint32`; the message
//! formats have no narrower integers.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use jpc_core::{ReflectMessage, ScalarKind, Value, ValueKind};

use crate::error::SchemaError;
use crate::message::{Leaf, MessageSchema};
use crate::text::TextSchema;

// ─── Value Traits ────────────────────────────────────────────────────

/// Types the [`Boolean`] schema accepts.
pub trait BooleanValue {
    fn to_bool(&self) -> bool;
}

impl BooleanValue for bool {
    fn to_bool(&self) -> bool {
        *self
    }
}

/// Types the [`Number`] schema accepts.
pub trait NumberValue {
    /// The message kind values of this type are stored as.
    const KIND: ScalarKind;

    /// Write the JSON number token.
    fn write_number(&self, out: &mut dyn fmt::Write) -> fmt::Result;

    fn to_value<M>(&self) -> Value<M>;

    /// Zero of [`KIND`](Self::KIND).
    fn zero<M>() -> Value<M>;
}

macro_rules! integer_value {
    ($($ty:ty => $kind:ident as $wide:ty),* $(,)?) => {$(
        impl NumberValue for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn write_number(&self, out: &mut dyn fmt::Write) -> fmt::Result {
                write!(out, "{self}")
            }

            fn to_value<M>(&self) -> Value<M> {
                Value::$kind(<$wide>::from(*self))
            }

            fn zero<M>() -> Value<M> {
                Value::$kind(0)
            }
        }
    )*};
}

integer_value! {
    i8 => Int32 as i32,
    i16 => Int32 as i32,
    i32 => Int32 as i32,
    i64 => Int64 as i64,
    u8 => UInt32 as u32,
    u16 => UInt32 as u32,
    u32 => UInt32 as u32,
    u64 => UInt64 as u64,
}

// JSON has no token for NaN or the infinities; they render as `null`.
macro_rules! float_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl NumberValue for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn write_number(&self, out: &mut dyn fmt::Write) -> fmt::Result {
                if self.is_finite() {
                    write!(out, "{self}")
                } else {
                    out.write_str("null")
                }
            }

            fn to_value<M>(&self) -> Value<M> {
                Value::$kind(*self)
            }

            fn zero<M>() -> Value<M> {
                Value::$kind(0.0)
            }
        }
    )*};
}

float_value! {
    f32 => Float,
    f64 => Double,
}

/// Types the [`Enumeration`] schema accepts.
///
/// Implemented by the caller for each enum, returning the enum's number in
/// the target message type:
///
/// ```
/// use jpc_schema::EnumValue;
///
/// #[derive(Clone, Copy)]
/// enum Colour { Red = 1, Green = 2 }
///
/// impl EnumValue for Colour {
///     fn number(&self) -> i32 {
///         *self as i32
///     }
/// }
/// ```
pub trait EnumValue {
    fn number(&self) -> i32;
}

/// Types the [`Str`] schema accepts.
pub trait StringValue {
    fn as_text(&self) -> &str;
}

impl StringValue for str {
    fn as_text(&self) -> &str {
        self
    }
}

impl StringValue for String {
    fn as_text(&self) -> &str {
        self
    }
}

impl StringValue for Cow<'_, str> {
    fn as_text(&self) -> &str {
        self
    }
}

impl<T: StringValue + ?Sized> StringValue for Rc<T> {
    fn as_text(&self) -> &str {
        (**self).as_text()
    }
}

impl<T: StringValue + ?Sized> StringValue for Arc<T> {
    fn as_text(&self) -> &str {
        (**self).as_text()
    }
}

macro_rules! forward_through {
    ($($ptr:ty),*) => {$(
        impl<T: BooleanValue + ?Sized> BooleanValue for $ptr {
            fn to_bool(&self) -> bool {
                (**self).to_bool()
            }
        }

        impl<T: NumberValue + ?Sized> NumberValue for $ptr {
            const KIND: ScalarKind = T::KIND;

            fn write_number(&self, out: &mut dyn fmt::Write) -> fmt::Result {
                (**self).write_number(out)
            }

            fn to_value<M>(&self) -> Value<M> {
                (**self).to_value()
            }

            fn zero<M>() -> Value<M> {
                T::zero()
            }
        }

        impl<T: EnumValue + ?Sized> EnumValue for $ptr {
            fn number(&self) -> i32 {
                (**self).number()
            }
        }

        impl<T: StringValue + ?Sized> StringValue for $ptr {
            fn as_text(&self) -> &str {
                (**self).as_text()
            }
        }
    )*};
}

forward_through!(&T, Box<T>);

// ─── Schemas ─────────────────────────────────────────────────────────

/// Schema for boolean values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

/// Schema for numeric values of any width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Number;

/// Schema for enum values, rendered by number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Enumeration;

/// How [`Str`] writes text between the quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Write the text as is.
    #[default]
    Verbatim,
    /// Escape quotes, backslashes and control characters as JSON requires.
    Json,
}

/// Schema for text values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Str {
    escaping: Escaping,
}

impl Str {
    /// The same schema, escaping text for JSON.
    pub fn escaped(self) -> Self {
        Self {
            escaping: Escaping::Json,
        }
    }

    pub fn escaping(&self) -> Escaping {
        self.escaping
    }
}

pub fn boolean() -> Boolean {
    Boolean
}

pub fn number() -> Number {
    Number
}

pub fn enumeration() -> Enumeration {
    Enumeration
}

/// Text schema writing values verbatim between quotes.
pub fn string() -> Str {
    Str::default()
}

impl<T: BooleanValue + ?Sized> TextSchema<T> for Boolean {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_str(if value.to_bool() { "true" } else { "false" })
    }
}

impl<T: BooleanValue + ?Sized, M: ReflectMessage> MessageSchema<T, M> for Boolean {
    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }

    fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError> {
        Ok(Leaf::Value(Value::Bool(value.to_bool())))
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Value(Value::Bool(false))
    }
}

impl<T: NumberValue + ?Sized> TextSchema<T> for Number {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        value.write_number(out)
    }
}

impl<T: NumberValue + ?Sized, M: ReflectMessage> MessageSchema<T, M> for Number {
    fn kind(&self) -> ValueKind {
        ValueKind::scalar(T::KIND)
    }

    fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError> {
        Ok(Leaf::Value(value.to_value()))
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Value(T::zero())
    }
}

impl<T: EnumValue + ?Sized> TextSchema<T> for Enumeration {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{}", value.number())
    }
}

impl<T: EnumValue + ?Sized, M: ReflectMessage> MessageSchema<T, M> for Enumeration {
    fn kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError> {
        Ok(Leaf::Value(Value::Enum(value.number())))
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Value(Value::Enum(0))
    }
}

impl<T: StringValue + ?Sized> TextSchema<T> for Str {
    fn write_text(&self, value: &T, out: &mut dyn fmt::Write) -> fmt::Result {
        match self.escaping {
            Escaping::Verbatim => {
                out.write_char('"')?;
                out.write_str(value.as_text())?;
                out.write_char('"')
            }
            Escaping::Json => {
                let quoted = serde_json::to_string(value.as_text()).map_err(|_| fmt::Error)?;
                out.write_str(&quoted)
            }
        }
    }
}

impl<T: StringValue + ?Sized, M: ReflectMessage> MessageSchema<T, M> for Str {
    fn kind(&self) -> ValueKind {
        ValueKind::String
    }

    fn to_leaf(&self, value: &T) -> Result<Leaf<M>, SchemaError> {
        Ok(Leaf::Value(Value::String(value.as_text().to_owned())))
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Value(Value::String(String::new()))
    }
}
