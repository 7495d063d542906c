//! Selection preconditions checked before a handler runs.
//!
//! | Command            | Needs namespace | Needs queue |
//! |--------------------|-----------------|-------------|
//! | `namespace ...`    | no              | no          |
//! | `queue ...`        | yes             | no          |
//! | message commands   | yes             | yes         |
//! | `help`, `exit`     | no              | no          |
//!
//! Each check hands back the target the handler operates on, so handlers
//! never look at the optional selection themselves.

use kokaq_core::QueueRef;

use crate::command::Command;
use crate::error::{ShellError, ShellResult};
use crate::session::Session;

/// What a command needs selected before it may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Runs without a selection.
    Nothing,
    /// Needs a selected namespace.
    Namespace,
    /// Needs a selected namespace and queue.
    Queue,
}

impl Requirement {
    /// Requirement for a parsed command.
    #[must_use]
    pub const fn of(command: &Command) -> Self {
        match command {
            Command::Namespace(_) | Command::Help | Command::Exit => Self::Nothing,
            Command::Queue(_) => Self::Namespace,
            Command::Message(_) => Self::Queue,
        }
    }
}

/// Check `requirement` against `session` without touching either.
///
/// # Errors
///
/// Returns the guidance error for the first missing selection.
pub fn check(requirement: Requirement, session: &Session) -> ShellResult<()> {
    match requirement {
        Requirement::Nothing => Ok(()),
        Requirement::Namespace => require_namespace(session).map(|_| ()),
        Requirement::Queue => require_queue(session).map(|_| ()),
    }
}

/// The selected namespace.
///
/// # Errors
///
/// Returns [`ShellError::NamespaceRequired`] when nothing is selected.
pub fn require_namespace(session: &Session) -> ShellResult<&str> {
    session
        .current_namespace()
        .ok_or(ShellError::NamespaceRequired)
}

/// The selected queue.
///
/// # Errors
///
/// Returns [`ShellError::QueueRequired`] when the namespace or queue is missing.
pub fn require_queue(session: &Session) -> ShellResult<QueueRef> {
    session.queue_ref().ok_or(ShellError::QueueRequired)
}
