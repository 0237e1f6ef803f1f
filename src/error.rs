//! Error types shared by the whole engine.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AliasError>;

/// Exit status used by the binary for every engine-detected failure.
///
/// Kept apart from 1 so a failing alias setup can be told from a failing
/// shell command.
pub const ENGINE_FAILURE: i32 = 2;

/// Everything that can go wrong while composing or running an alias.
#[derive(Error, Debug)]
pub enum AliasError {
    /// A positional argument was required but the command line didn't have it.
    #[error("{message}")]
    ArgumentMissing {
        /// Index that was asked for
        index: usize,
        /// Message reported to the user
        message: String,
    },

    /// A flag was required but not set.
    #[error("{message}")]
    FlagMissing {
        /// Flag name without dashes
        name: String,
        /// Message reported to the user
        message: String,
    },

    /// `build_command` was reached with an empty base command.
    #[error("base command is not set")]
    BaseCommandUnset,

    /// Only one or two leading dashes are meaningful.
    #[error("invalid dash count {0} for flag (expected 1 or 2)")]
    InvalidDashSpec(u8),

    /// A caller handed the builder something it can't use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Dispatch didn't find the requested alias.
    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    /// The same alias name was registered twice.
    #[error("alias '{0}' already exists")]
    DuplicateAlias(String),

    /// Alias names end up in shell `alias` lines and must be plain words.
    #[error("invalid alias name '{0}'")]
    InvalidAliasName(String),

    /// Reading or writing the persisted store failed.
    #[error("store file {}: {source}", .path.display())]
    StoreIo {
        /// Store file involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Writing the composed command out failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The host shell couldn't be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        /// Command line handed to the shell
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl AliasError {
    /// Build an `ArgumentMissing` error, falling back to a generic message.
    pub(crate) fn argument_missing(index: usize, message: Option<&str>) -> Self {
        AliasError::ArgumentMissing {
            index,
            message: message
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Argument at index {index} not found")),
        }
    }

    /// Build a `FlagMissing` error, falling back to a generic message.
    pub(crate) fn flag_missing(name: &str, message: Option<&str>) -> Self {
        AliasError::FlagMissing {
            name: name.to_owned(),
            message: message
                .map(str::to_owned)
                .unwrap_or_else(|| format!("Flag '{name}' not set")),
        }
    }

    /// Exit status the binary should terminate with for this error.
    pub fn exit_code(&self) -> i32 {
        ENGINE_FAILURE
    }
}
