//! Failures reported by the shell.
//!
//! # Design
//! - `ShellError` covers a single input line. None of its variants end the
//!   loop; the REPL prints them and keeps the session as it was.
//! - `StartupError` covers everything before the first prompt and maps to a
//!   non-zero exit code.

use std::io;

use kokaq_config::ConfigError;
use kokaq_core::{RemoteError, RemoteErrorKind};
use kokaq_telemetry::TelemetryError;
use thiserror::Error;
use tracing::warn;

/// Result alias for line-level shell operations.
pub type ShellResult<T> = Result<T, ShellError>;

/// Errors produced while handling one input line.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Arguments did not match the command's form.
    #[error("usage: {usage}")]
    Usage {
        /// Expected form of the command.
        usage: &'static str,
    },
    /// `namespace` or `queue` was entered without a subcommand.
    #[error("{verb}: missing subcommand")]
    MissingSubcommand {
        /// The verb missing its subcommand.
        verb: &'static str,
    },
    /// The verb or subcommand is not part of the grammar.
    #[error("unknown command: {input}")]
    UnknownCommand {
        /// The tokens as entered, joined by single spaces.
        input: String,
    },
    /// The priority token is not a base-10 unsigned 64-bit integer.
    #[error("invalid priority '{value}': expected an unsigned 64-bit integer")]
    InvalidPriority {
        /// Offending token.
        value: String,
    },
    /// A numeric argument could not be parsed or is out of range.
    #[error("invalid {field} '{value}': {reason}")]
    InvalidNumber {
        /// Argument name.
        field: &'static str,
        /// Offending token.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },
    /// The command needs a namespace selection.
    #[error("set namespace first using 'namespace use'")]
    NamespaceRequired,
    /// The command needs both a namespace and a queue selection.
    #[error("set namespace and queue first using 'namespace use' and 'queue use'")]
    QueueRequired,
    /// The queue service rejected or failed the call.
    #[error("{operation} failed: {source}")]
    Remote {
        /// Shell operation that issued the call, e.g. `namespace create`.
        operation: &'static str,
        /// Classified failure from the service.
        #[source]
        source: RemoteError,
    },
}

impl ShellError {
    /// Build a closure mapping a facade failure for `operation`, logging it once.
    pub(crate) fn remote(operation: &'static str) -> impl FnOnce(RemoteError) -> Self {
        move |source| {
            warn!(
                operation,
                kind = %source.kind,
                error = %source.message,
                "remote call failed"
            );
            Self::Remote { operation, source }
        }
    }

    /// Classification of a remote failure, when this error came from the service.
    #[must_use]
    pub const fn remote_kind(&self) -> Option<RemoteErrorKind> {
        match self {
            Self::Remote { source, .. } => Some(source.kind),
            _ => None,
        }
    }
}

/// Errors that stop the shell before the loop starts, or break the terminal.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Flags or environment produced an unusable configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    /// The startup probe against the service failed.
    #[error("failed to connect to server at {address}: {source}")]
    Connect {
        /// Address as entered by the operator.
        address: String,
        /// Classified failure from the probe.
        #[source]
        source: RemoteError,
    },
    /// Reading input or writing replies failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

impl StartupError {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Telemetry(_) | Self::Connect { .. } | Self::Terminal(_) => 1,
        }
    }
}
