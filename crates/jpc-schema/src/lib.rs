//! # jpc-schema — Schema Combinators
//!
//! Compose a schema once, then render any number of source objects through
//! it, either as compact JSON text or into reflective messages.
//!
//! ## Schemas
//!
//! - [`boolean`], [`number`], [`enumeration`], [`string`]: primitives, each
//!   generic over a family of value types ([`primitive`]).
//! - [`array`] over any [`Sequence`], [`optional`] over any [`Presence`].
//! - [`object`]: named fields, each a schema plus an [`Extractor`]
//!   ([`object`](mod@object)).
//!
//! Every schema implements [`TextSchema`] for the values it accepts, and
//! [`MessageSchema`] for each [`ReflectMessage`](jpc_core::ReflectMessage)
//! type. Schemas are immutable values; `&S` and `Arc<S>` are schemas too,
//! so a nested object schema can live in a `static` and be shared.
//!
//! ## Validation
//!
//! [`ObjectSchema::validate`] checks field names and kinds against the
//! target descriptor without touching data, reporting
//! [`SchemaError::MissingField`] or [`SchemaError::TypeMismatch`]. Call it
//! once per schema at initialization and treat failure as fatal.
//!
//! ## Crate Policy
//!
//! - Depends only on `jpc-core` internally.
//! - Rendering never panics; message rendering fails only where
//!   validation would have.
//! - Text rendering is one-directional. There is no parser.

pub mod array;
pub mod error;
pub mod extract;
pub mod message;
pub mod object;
pub mod optional;
pub mod primitive;
pub mod text;

pub use array::{array, Array, Sequence};
pub use error::SchemaError;
pub use extract::{compute, project, Compute, Extractor, Project};
pub use message::{Leaf, MessageSchema};
pub use object::{object, ObjectSchema, ObjectSchemaBuilder};
pub use optional::{optional, Optional, Presence};
pub use primitive::{
    boolean, enumeration, number, string, Boolean, BooleanValue, Enumeration, EnumValue, Escaping,
    Number, NumberValue, Str, StringValue,
};
pub use text::{Text, TextSchema};

/// Schema constructors and the traits their methods come from.
pub mod prelude {
    pub use crate::{
        array, boolean, enumeration, number, object, optional, string, EnumValue, MessageSchema,
        ObjectSchema, SchemaError, TextSchema,
    };
}
