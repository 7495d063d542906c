//! Handlers grouped by the selection they operate on.
//!
//! Handlers only talk to the queue service. Selection changes come back as a
//! [`SessionChange`] that the router applies once the call has succeeded.

pub(crate) mod messages;
pub(crate) mod namespace;
pub(crate) mod queue;

use crate::session::SessionChange;

/// Output of one handler invocation.
#[derive(Debug, Default)]
pub(crate) struct Reply {
    pub(crate) lines: Vec<String>,
    pub(crate) changes: Vec<SessionChange>,
}

impl Reply {
    pub(crate) fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            changes: Vec::new(),
        }
    }

    pub(crate) fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub(crate) fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub(crate) fn with_change(mut self, change: SessionChange) -> Self {
        self.changes.push(change);
        self
    }
}
