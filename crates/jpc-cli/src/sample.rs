//! # Sample Subcommand
//!
//! Builds the bundled Foo/Bar schemas against `sample.FooInfo` and
//! `sample.BarInfo`, validates them, and prints one rendering of a fixed
//! sample value. Descriptors come from `descriptors/sample.yaml`, compiled
//! into the binary, unless `--descriptors` names another file; pointing it
//! at a file whose messages disagree with the schemas is the quickest way to
//! see validation errors.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use jpc_core::{pool_from_yaml, DescriptorPool, MessageDescriptor};
use jpc_schema::prelude::*;

/// The descriptor file bundled with the binary.
pub const SAMPLE_DESCRIPTORS: &str = include_str!("../descriptors/sample.yaml");

/// Arguments for the `jpc sample` subcommand.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Descriptor file declaring sample.FooInfo and sample.BarInfo.
    #[arg(long, value_name = "FILE")]
    pub descriptors: Option<PathBuf>,

    /// Which rendering to print.
    #[arg(long, value_enum, default_value_t = Format::Both)]
    pub format: Format,
}

/// Output selection for `jpc sample`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// The compact JSON text rendering.
    Text,
    /// The message rendering, shown as JSON.
    Message,
    /// Text first, then the message.
    Both,
}

/// Source enum for `Foo::h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum H {
    X = 1,
    Y = 2,
}

impl EnumValue for H {
    fn number(&self) -> i32 {
        *self as i32
    }
}

#[derive(Debug)]
pub struct Bar {
    pub x: bool,
    pub y: i64,
    pub z: Option<String>,
}

#[derive(Debug)]
pub struct Foo {
    pub a: bool,
    pub b: i32,
    pub c: i64,
    pub d: u32,
    pub e: u64,
    pub f: f64,
    pub g: f32,
    pub h: H,
    i: String,
    pub j: Vec<i32>,
    pub k: BTreeSet<String>,
    pub l: Option<i32>,
    pub m: Option<i32>,
    pub n: i64,
    pub o: Option<Box<i32>>,
    pub p: Option<Box<i32>>,
    pub bar: Bar,
}

impl Foo {
    pub fn i(&self) -> &str {
        &self.i
    }
}

/// The value `jpc sample` renders.
pub fn sample_foo() -> Foo {
    Foo {
        a: true,
        b: 101,
        c: 202,
        d: 303,
        e: 404,
        f: 1.1,
        g: 2.2,
        h: H::X,
        i: "hello".to_string(),
        j: vec![1, 2, 3],
        k: ["hello", "world"].into_iter().map(String::from).collect(),
        l: Some(505),
        m: None,
        n: 606,
        o: Some(Box::new(707)),
        p: None,
        bar: Bar {
            x: false,
            y: 42,
            z: None,
        },
    }
}

/// Both sample schemas, bound to one descriptor pool.
#[derive(Debug)]
pub struct SampleSchemas {
    pub bar: Arc<ObjectSchema<Bar>>,
    pub foo: ObjectSchema<Foo>,
}

impl SampleSchemas {
    /// Build the schemas against `sample.FooInfo` and `sample.BarInfo`.
    ///
    /// Nothing is validated here; see [`validate`](Self::validate).
    pub fn build(pool: &DescriptorPool) -> Result<Self> {
        let bar = Arc::new(bar_schema(&message(pool, "sample.BarInfo")?));
        let foo = foo_schema(&message(pool, "sample.FooInfo")?, Arc::clone(&bar));
        Ok(Self { bar, foo })
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        self.bar.validate()?;
        self.foo.validate()
    }
}

fn message(pool: &DescriptorPool, name: &str) -> Result<MessageDescriptor> {
    pool.get_message_by_name(name)
        .with_context(|| format!("descriptor file does not declare message {name}"))
}

fn bar_schema(descriptor: &MessageDescriptor) -> ObjectSchema<Bar> {
    object::<Bar>(descriptor)
        .field("x", boolean(), |b| &b.x)
        .field("y", number(), |b| &b.y)
        .field("z", optional(string()), |b| &b.z)
        .build()
}

fn foo_schema(descriptor: &MessageDescriptor, bar: Arc<ObjectSchema<Bar>>) -> ObjectSchema<Foo> {
    object::<Foo>(descriptor)
        .field("a", boolean(), |f| &f.a)
        .field("b", number(), |f| &f.b)
        .field("c", number(), |f| &f.c)
        .field("d", number(), |f| &f.d)
        .field("e", number(), |f| &f.e)
        .field("f", number(), |f| &f.f)
        .field("g", number(), |f| &f.g)
        .field("h", enumeration(), |f| &f.h)
        .field("i", string(), Foo::i)
        .field("j", array(number()), |f| &f.j)
        .field("k", array(string()), |f| &f.k)
        .field("l", optional(number()), |f| &f.l)
        .field("m", optional(number()), |f| &f.m)
        .field("n", number(), |f| &f.n)
        .field("o", optional(number()), |f| &f.o)
        .field("p", optional(number()), |f| &f.p)
        .field("bar", bar, |f| &f.bar)
        .build()
}

/// Load the pool `args` selects.
fn load_pool(args: &SampleArgs) -> Result<DescriptorPool> {
    match &args.descriptors {
        Some(path) => jpc_core::load_pool(path)
            .with_context(|| format!("failed to load descriptors from {}", path.display())),
        None => pool_from_yaml(SAMPLE_DESCRIPTORS).context("bundled sample descriptors are invalid"),
    }
}

/// Render `foo` in the selected formats, one string per rendering.
pub fn render(schemas: &SampleSchemas, foo: &Foo, format: Format) -> Result<Vec<String>> {
    let mut out = Vec::new();
    if matches!(format, Format::Text | Format::Both) {
        out.push(schemas.foo.to_text_string(foo)?);
    }
    if matches!(format, Format::Message | Format::Both) {
        let message = schemas.foo.to_message(foo)?;
        out.push(serde_json::to_string_pretty(&jpc_core::to_json(&message)?)?);
    }
    Ok(out)
}

/// Execute the sample subcommand.
///
/// Returns exit code: 0 on success, 1 when the schemas do not fit the
/// descriptors.
pub fn run_sample(args: &SampleArgs) -> Result<u8> {
    let pool = load_pool(args)?;
    tracing::debug!(messages = pool.all_messages().count(), "loaded descriptor pool");

    let schemas = SampleSchemas::build(&pool)?;
    if let Err(e) = schemas.validate() {
        tracing::error!(error = %e, "schema validation failed");
        return Ok(1);
    }
    tracing::info!(fields = schemas.foo.len(), "sample schemas validated");

    for rendering in render(&schemas, &sample_foo(), args.format)? {
        println!("{rendering}");
    }
    Ok(0)
}
