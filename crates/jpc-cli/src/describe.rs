//! # Describe Subcommand
//!
//! Prints every message of a descriptor file, one field per line:
//!
//! ```text
//! message sample.BarInfo
//!   1 required bool x
//!   2 optional int64 y
//! ```

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jpc_core::{load_pool, DescriptorPool, FieldDescriptorExt};

/// Arguments for the `jpc describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Descriptor file to read: `.json` for JSON, `.pb`/`.binpb`/`.desc`
    /// for a binary descriptor set, YAML otherwise.
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    let pool = load_pool(&args.path)
        .with_context(|| format!("failed to load descriptors from {}", args.path.display()))?;
    print!("{}", PoolListing(&pool));
    Ok(0)
}

/// The listing of every message in a pool, in declaration order.
pub struct PoolListing<'a>(pub &'a DescriptorPool);

impl fmt::Display for PoolListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.0.all_messages().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "message {}", message.full_name())?;
            for field in message.fields() {
                writeln!(
                    f,
                    "  {} {} {} {}",
                    field.number(),
                    field.declared_cardinality(),
                    field.declared_type(),
                    field.name()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpc_core::pool_from_yaml;

    #[test]
    fn test_describe_lists_fields() {
        let pool = pool_from_yaml(
            r#"
package: t
messages:
  - name: Inner
    fields:
      - { name: x, label: required, type: bool }
  - name: Outer
    fields:
      - { name: tags, number: 4, label: repeated, type: string }
      - { name: inner, number: 7, type: message, type_name: Inner }
      - { name: raw, number: 8, type: bytes }
"#,
        )
        .unwrap();
        assert_eq!(
            PoolListing(&pool).to_string(),
            "message t.Inner\n  1 required bool x\n\nmessage t.Outer\n  4 repeated string tags\n  7 optional t.Inner inner\n  8 optional bytes raw\n"
        );
    }

    #[test]
    fn test_empty_pool_lists_nothing() {
        let pool = pool_from_yaml("messages: []").unwrap();
        assert_eq!(PoolListing(&pool).to_string(), "");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let args = DescribeArgs {
            path: PathBuf::from("/nonexistent/descriptors.yaml"),
        };
        let err = run_describe(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load descriptors"));
    }
}
