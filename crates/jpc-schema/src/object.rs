//! # Object Schema
//!
//! [`ObjectSchema`] composes named fields, each pairing a sub-schema with an
//! [`Extractor`], into a schema for a whole source object. Declaration
//! order is significant: it fixes the member order of the text rendering.
//!
//! An object schema is bound to one message descriptor at construction but
//! never checked against it there. [`ObjectSchema::validate`] runs the
//! per-field lookup and type check against a data-free dummy message and is
//! meant to be called once, at initialization:
//!
//! ```
//! use jpc_core::pool_from_yaml;
//! use jpc_schema::prelude::*;
//!
//! struct Point { x: i32, visible: bool }
//!
//! let pool = pool_from_yaml(
//!     r#"
//! package: demo
//! messages:
//!   - name: Point
//!     fields:
//!       - { name: x, label: required, type: int32 }
//!       - { name: visible, label: required, type: bool }
//! "#,
//! )
//! .unwrap();
//! let descriptor = pool.get_message_by_name("demo.Point").unwrap();
//!
//! let schema = object::<Point>(&descriptor)
//!     .field("x", number(), |p| &p.x)
//!     .field("visible", boolean(), |p| &p.visible)
//!     .build()
//!     .checked()
//!     .unwrap();
//!
//! let point = Point { x: 4, visible: true };
//! assert_eq!(schema.to_text(&point).to_string(), r#"{"x":4,"visible":true}"#);
//! let message = schema.to_message(&point).unwrap();
//! assert!(message.has_field_by_name("visible"));
//! ```
//!
//! ## States
//!
//! A schema is either unvalidated or validated. Validation does not mutate
//! the schema and is idempotent; if the descriptor it was built against
//! changes shape, build and validate a new schema.

use std::fmt;
use std::marker::PhantomData;

use jpc_core::{DynamicMessage, FieldDescriptor, MessageDescriptor, ReflectMessage, Value, ValueKind};

use crate::error::SchemaError;
use crate::extract::{compute, project, Extractor};
use crate::message::{render_field, Leaf, MessageSchema};
use crate::text::{write_joined, TextSchema};

/// One named field, with its schema and extractor erased.
trait ObjectField<O: ?Sized, M: ReflectMessage>: Send + Sync {
    fn name(&self) -> &str;

    /// Write `"name":value`.
    fn write_member(&self, source: &O, out: &mut dyn fmt::Write) -> fmt::Result;

    fn message_type(&self) -> Option<&MessageDescriptor>;

    fn leaf(&self, source: &O) -> Result<Leaf<M>, SchemaError>;

    fn placeholder(&self) -> Leaf<M>;

    fn validate_nested(&self) -> Result<(), SchemaError>;
}

struct Field<O: ?Sized, V: ?Sized, S, E> {
    name: String,
    schema: S,
    extractor: E,
    _types: PhantomData<fn(&O) -> &V>,
}

impl<O, V, S, E, M> ObjectField<O, M> for Field<O, V, S, E>
where
    O: ?Sized,
    V: ?Sized,
    S: TextSchema<V> + MessageSchema<V, M> + Send + Sync,
    E: Extractor<O, V> + Send + Sync,
    M: ReflectMessage,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn write_member(&self, source: &O, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_char('"')?;
        out.write_str(&self.name)?;
        out.write_str("\":")?;
        self.extractor
            .with_value(source, |value| self.schema.write_text(value, out))
    }

    fn message_type(&self) -> Option<&MessageDescriptor> {
        self.schema.message_type()
    }

    fn leaf(&self, source: &O) -> Result<Leaf<M>, SchemaError> {
        self.extractor
            .with_value(source, |value| self.schema.to_leaf(value))
    }

    fn placeholder(&self) -> Leaf<M> {
        self.schema.placeholder()
    }

    fn validate_nested(&self) -> Result<(), SchemaError> {
        self.schema.validate_nested()
    }
}

/// Schema for a source object `O` rendered into messages of type `M`.
pub struct ObjectSchema<O: ?Sized, M: ReflectMessage = DynamicMessage> {
    descriptor: MessageDescriptor,
    fields: Vec<Box<dyn ObjectField<O, M>>>,
}

/// Start an object schema over `O` targeting [`DynamicMessage`]s of type
/// `descriptor`.
pub fn object<O: ?Sized + 'static>(
    descriptor: &MessageDescriptor,
) -> ObjectSchemaBuilder<O, DynamicMessage> {
    ObjectSchema::builder(descriptor)
}

impl<O: ?Sized, M: ReflectMessage> ObjectSchema<O, M> {
    pub fn builder(descriptor: &MessageDescriptor) -> ObjectSchemaBuilder<O, M> {
        ObjectSchemaBuilder {
            descriptor: descriptor.clone(),
            fields: Vec::new(),
        }
    }

    /// The message type this schema renders into.
    pub fn descriptor(&self) -> &MessageDescriptor {
        &self.descriptor
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render `source` into a fresh message.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingField`] or [`SchemaError::TypeMismatch`] for
    /// the first field, in declaration order, that does not fit the
    /// message. A schema that passed [`validate`](Self::validate) never
    /// fails here.
    pub fn to_message(&self, source: &O) -> Result<M, SchemaError> {
        let mut message = M::new(&self.descriptor);
        for field in &self.fields {
            let target = lookup(&message, field.name())?;
            let leaf = field.leaf(source)?;
            render_field(&mut message, &target, leaf, field.message_type())?;
        }
        Ok(message)
    }

    /// Check every field name and kind against the descriptor, without data.
    ///
    /// Runs the [`to_message`](Self::to_message) sequence against a
    /// default-constructed message using placeholder leaves, then validates
    /// nested object schemas the same way.
    ///
    /// # Errors
    ///
    /// The first mismatch found, in declaration order.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut dummy = M::new(&self.descriptor);
        for field in &self.fields {
            let target = lookup(&dummy, field.name())?;
            let leaf = field.placeholder();
            render_field(&mut dummy, &target, leaf, field.message_type())?;
            field.validate_nested()?;
        }
        tracing::debug!(
            message = self.descriptor.full_name(),
            fields = self.fields.len(),
            "object schema validated"
        );
        Ok(())
    }

    /// Validate, handing the schema back on success.
    pub fn checked(self) -> Result<Self, SchemaError> {
        self.validate()?;
        Ok(self)
    }
}

fn lookup<M: ReflectMessage>(message: &M, name: &str) -> Result<FieldDescriptor, SchemaError> {
    message
        .find_field_by_name(name)
        .ok_or_else(|| SchemaError::MissingField {
            message: message.descriptor().full_name().to_string(),
            field: name.to_string(),
        })
}

impl<O: ?Sized, M: ReflectMessage> fmt::Debug for ObjectSchema<O, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("message", &self.descriptor.full_name())
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

impl<O: ?Sized, M: ReflectMessage> TextSchema<O> for ObjectSchema<O, M> {
    fn write_text(&self, value: &O, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_char('{')?;
        write_joined(out, &self.fields, |field, out| field.write_member(value, out))?;
        out.write_char('}')
    }
}

impl<O: ?Sized, M: ReflectMessage> MessageSchema<O, M> for ObjectSchema<O, M> {
    fn kind(&self) -> ValueKind {
        ValueKind::Message
    }

    fn to_leaf(&self, value: &O) -> Result<Leaf<M>, SchemaError> {
        Ok(Leaf::Value(Value::Message(self.to_message(value)?)))
    }

    fn placeholder(&self) -> Leaf<M> {
        Leaf::Value(Value::Message(M::new(&self.descriptor)))
    }

    fn message_type(&self) -> Option<&MessageDescriptor> {
        Some(&self.descriptor)
    }

    fn validate_nested(&self) -> Result<(), SchemaError> {
        self.validate()
    }
}

/// Collects the fields of an [`ObjectSchema`].
///
/// Every field method takes the field name, the schema for its value and a
/// way to reach the value from the source object. Nothing is checked until
/// the finished schema is validated.
pub struct ObjectSchemaBuilder<O: ?Sized, M: ReflectMessage> {
    descriptor: MessageDescriptor,
    fields: Vec<Box<dyn ObjectField<O, M>>>,
}

impl<O: ?Sized + 'static, M: ReflectMessage> ObjectSchemaBuilder<O, M> {
    /// Add a field whose value is borrowed from the source object: a
    /// member, an accessor method or a dereferenced slot.
    pub fn field<V, S, F>(self, name: impl Into<String>, schema: S, extract: F) -> Self
    where
        V: ?Sized + 'static,
        S: TextSchema<V> + MessageSchema<V, M> + Send + Sync + 'static,
        F: Fn(&O) -> &V + Send + Sync + 'static,
    {
        self.field_by::<V, S, _>(name, schema, project::<O, V, F>(extract))
    }

    /// Add a field whose value is computed from the source object.
    pub fn field_with<V, S, F>(self, name: impl Into<String>, schema: S, extract: F) -> Self
    where
        V: 'static,
        S: TextSchema<V> + MessageSchema<V, M> + Send + Sync + 'static,
        F: Fn(&O) -> V + Send + Sync + 'static,
    {
        self.field_by::<V, S, _>(name, schema, compute::<O, V, F>(extract))
    }

    /// Add a field read through a custom [`Extractor`].
    pub fn field_by<V, S, E>(mut self, name: impl Into<String>, schema: S, extractor: E) -> Self
    where
        V: ?Sized + 'static,
        S: TextSchema<V> + MessageSchema<V, M> + Send + Sync + 'static,
        E: Extractor<O, V> + Send + Sync + 'static,
    {
        self.fields.push(Box::new(Field {
            name: name.into(),
            schema,
            extractor,
            _types: PhantomData,
        }));
        self
    }

    pub fn build(self) -> ObjectSchema<O, M> {
        ObjectSchema {
            descriptor: self.descriptor,
            fields: self.fields,
        }
    }
}
