#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Interactive shell for operating a Kokaq priority-queue deployment.
//!
//! Layout:
//! - `parser.rs`: tokenizing input lines into `Command` values
//! - `command.rs`: the closed command set
//! - `session.rs`: the namespace/queue selection and the prompt
//! - `guard.rs`: selection preconditions checked before dispatch
//! - `shell.rs`: the router tying parser, guard, handlers and session together
//! - `commands/`: handlers grouped by concern
//! - `repl.rs`: the read-eval-print loop and its signal handling
//! - `cli.rs`: flags, startup, and the process exit code
//! - `output.rs`: banner, help text, and reply renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub mod command;
pub mod error;
pub mod guard;
pub mod parser;
pub mod repl;
pub mod session;
pub mod shell;

pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::run;
pub use command::{Command, MessageCommand, ScopeAction};
pub use error::{ShellError, ShellResult, StartupError};
pub use parser::parse_line;
pub use repl::{ExitReason, SIGNAL_FAREWELL, run_repl};
pub use session::{Selection, Session, SessionChange};
pub use shell::{Control, Outcome, Shell};
