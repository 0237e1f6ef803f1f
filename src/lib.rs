//! Programmable shell aliases.
//!
//! An alias is a small Rust function that receives the command line typed
//! after the alias name, already split into positional arguments and flags,
//! and reshapes it into the command that should actually run. Aliases can
//! remember values between invocations through a tiny key-value store.
//!
//! The pieces, leaves first:
//! - [`store`]: the persisted `key=value` file,
//! - [`tokenizer`]: splitting of raw arguments into positionals and flags,
//! - [`CommandBuilder`]: the fluent API transforms use, with [`Branch`] for
//!   conditional chains,
//! - [`Registry`]: name to transform table and dispatch.
//!
//! The composed command is either printed (dry run) or handed to the host
//! shell. It is never interpreted here, and values are only quoted when they
//! contain a space, never escaped.

mod branch;
mod builder;
pub mod command;
pub mod config;
pub mod error;
mod registry;
mod shell;
pub mod store;
pub mod tokenizer;

pub use branch::Branch;
pub use builder::{
    clean_value, CommandBuilder, Connector, FlagOptions, Lookup, ValueRequirement,
};
pub use command::{ExitCode, Transform};
pub use config::Config;
pub use error::{AliasError, Result};
pub use registry::Registry;
pub use store::{SharedStore, Store};
