//! # jpc-cli — jpc Command-Line Interface
//!
//! A thin clap-based front end over `jpc-core` and `jpc-schema`.
//!
//! ## Subcommands
//!
//! - `describe` — list the messages and fields of a descriptor file
//! - `sample` — validate the bundled Foo/Bar schemas against descriptors
//!   and print their text and message renderings
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from the handlers.
//! - Handlers return an exit code; operational failures are `anyhow` errors
//!   and are reported once, in `main`.
//! - Results go to stdout, logs to stderr.

pub mod describe;
pub mod sample;
