//! Routing parsed commands to handlers.
//!
//! # Design
//! - `execute` is the whole per-line pipeline: parse, guard, dispatch, then
//!   apply any selection change. A failure at any step leaves the session as
//!   it was.
//! - Replies are returned as lines so callers decide where they are written.

use kokaq_core::QueueService;
use tracing::debug;

use crate::command::Command;
use crate::commands::Reply;
use crate::commands::messages::handle_message;
use crate::commands::namespace::handle_namespace;
use crate::commands::queue::handle_queue;
use crate::error::ShellResult;
use crate::guard::{self, Requirement};
use crate::output::{EXIT_FAREWELL, help_lines};
use crate::parser::parse_line;
use crate::session::Session;

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Show the prompt again.
    Continue,
    /// Leave the loop.
    Exit,
}

/// Reply lines for one input line and what the loop does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Lines to print, in order.
    pub lines: Vec<String>,
    /// Loop control after printing.
    pub control: Control,
}

impl Outcome {
    /// Nothing to print; keep going.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            lines: Vec::new(),
            control: Control::Continue,
        }
    }

    /// Print `lines` and keep going.
    #[must_use]
    pub const fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            control: Control::Continue,
        }
    }

    /// Print `farewell` and leave the loop.
    #[must_use]
    pub fn exit(farewell: impl Into<String>) -> Self {
        Self {
            lines: vec![farewell.into()],
            control: Control::Exit,
        }
    }

    /// Whether the loop should end.
    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.control == Control::Exit
    }
}

/// A session bound to a queue service.
#[derive(Debug)]
pub struct Shell<S> {
    session: Session,
    service: S,
}

impl<S> Shell<S>
where
    S: QueueService,
{
    /// Start a shell with an empty selection.
    #[must_use]
    pub fn new(address: impl Into<String>, service: S) -> Self {
        Self {
            session: Session::new(address),
            service,
        }
    }

    /// Current session state.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Underlying queue service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    /// Prompt for the next line.
    #[must_use]
    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    /// Parse and run one input line.
    ///
    /// # Errors
    ///
    /// Returns the parse, precondition, or remote error for the line. The
    /// session is unchanged whenever an error is returned.
    pub async fn execute(&mut self, line: &str) -> ShellResult<Outcome> {
        match parse_line(line)? {
            Some(command) => self.dispatch(command).await,
            None => Ok(Outcome::silent()),
        }
    }

    /// Run an already parsed command.
    ///
    /// # Errors
    ///
    /// See [`Shell::execute`].
    pub async fn dispatch(&mut self, command: Command) -> ShellResult<Outcome> {
        let requirement = Requirement::of(&command);
        debug!(verb = command.verb(), ?requirement, "dispatching command");
        guard::check(requirement, &self.session)?;
        let reply = match command {
            Command::Namespace(action) => handle_namespace(&self.service, action).await?,
            Command::Queue(action) => {
                let namespace = guard::require_namespace(&self.session)?;
                handle_queue(&self.service, namespace, action).await?
            }
            Command::Message(message) => {
                let queue = guard::require_queue(&self.session)?;
                handle_message(&self.service, &queue, message).await?
            }
            Command::Help => Reply::lines(help_lines()),
            Command::Exit => return Ok(Outcome::exit(EXIT_FAREWELL)),
        };
        for change in reply.changes {
            self.session.apply(change)?;
        }
        Ok(Outcome::lines(reply.lines))
    }

    /// Release the service connection.
    pub async fn close(&self) {
        self.service.close().await;
    }
}
