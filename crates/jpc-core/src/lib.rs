//! # jpc-core — Foundational Types for jpc
//!
//! Everything the schema engine needs to know about target messages, and
//! nothing about schemas. `jpc-schema` builds on this crate; this crate
//! depends on nothing internal.
//!
//! Descriptors, pools and dynamic messages are `prost-reflect`'s. This
//! crate adds the kind rules validation compares, a YAML/JSON descriptor
//! file format, and the [`ReflectMessage`] seam schemas write through.
//!
//! ## Contents
//!
//! - [`kind`]: [`ScalarKind`], [`Cardinality`] and the closed [`ValueKind`]
//!   variant that validation compares, with the [`accepts`] rule.
//! - [`descriptor`]: [`FieldDescriptorExt`], field descriptors read in
//!   those terms.
//! - [`pool`]: descriptor files in YAML or JSON, turned into a
//!   [`DescriptorPool`]; binary descriptor sets load as they are.
//! - [`reflect`]: the [`ReflectMessage`] capability (field lookup, kind-keyed
//!   setters, nested and repeated mutable access) and the [`Value`] it moves.
//! - [`dynamic`]: [`ReflectMessage`] for [`DynamicMessage`], and its JSON
//!   view.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jpc-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod descriptor;
pub mod dynamic;
pub mod error;
pub mod kind;
pub mod pool;
pub mod reflect;

pub use prost_reflect;
pub use prost_reflect::{DescriptorPool, DynamicMessage, FieldDescriptor, MessageDescriptor};

// Re-export primary types for ergonomic imports.
pub use descriptor::FieldDescriptorExt;
pub use dynamic::{to_json, ListField};
pub use error::{DescriptorFileError, ReflectError};
pub use kind::{accepts, Cardinality, ScalarKind, ValueKind};
pub use pool::{
    load_pool, pool_from_json, pool_from_yaml, DescriptorFile, EnumEntry, EnumValueEntry,
    FieldEntry, FieldType, MessageEntry,
};
pub use reflect::{ReflectMessage, RepeatedField, Value};
