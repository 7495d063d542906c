//! Namespace and queue selection for one shell session.

use kokaq_core::QueueRef;
use tracing::info;

use crate::error::{ShellError, ShellResult};

/// The selected namespace and, optionally, a queue inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    namespace: String,
    queue: Option<String>,
}

impl Selection {
    /// Selected namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Selected queue, if any.
    #[must_use]
    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref()
    }
}

/// Selection change requested by a handler after a successful remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// Select a namespace.
    SelectNamespace(String),
    /// Drop the namespace selection if it names this namespace.
    ForgetNamespace(String),
    /// Select a queue inside the selected namespace.
    SelectQueue(String),
    /// Drop the queue selection if it names this queue.
    ForgetQueue(String),
}

/// Interactive session state, owned by the REPL task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    address: String,
    selection: Option<Selection>,
}

impl Session {
    /// Start a session against `address` with nothing selected.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            selection: None,
        }
    }

    /// Connection target the session was opened with.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Current selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Selected namespace, if any.
    #[must_use]
    pub fn current_namespace(&self) -> Option<&str> {
        self.selection.as_ref().map(Selection::namespace)
    }

    /// Selected queue, if any.
    #[must_use]
    pub fn current_queue(&self) -> Option<&str> {
        self.selection.as_ref().and_then(Selection::queue)
    }

    /// Fully qualified reference to the selected queue.
    #[must_use]
    pub fn queue_ref(&self) -> Option<QueueRef> {
        let selection = self.selection.as_ref()?;
        let queue = selection.queue.as_deref()?;
        Some(QueueRef::new(selection.namespace.as_str(), queue))
    }

    /// Select `name`. Switching to another namespace drops the queue selection.
    pub fn select_namespace(&mut self, name: &str) {
        if self.current_namespace() != Some(name) {
            self.selection = Some(Selection {
                namespace: name.to_string(),
                queue: None,
            });
        }
        info!(namespace = name, "namespace selected");
    }

    /// Select queue `name` inside the selected namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::NamespaceRequired`] when no namespace is selected.
    pub fn select_queue(&mut self, name: &str) -> ShellResult<()> {
        let selection = self
            .selection
            .as_mut()
            .ok_or(ShellError::NamespaceRequired)?;
        selection.queue = Some(name.to_string());
        info!(namespace = %selection.namespace, queue = name, "queue selected");
        Ok(())
    }

    /// Clear the selection if `name` is the selected namespace.
    ///
    /// Returns whether anything was cleared.
    pub fn forget_namespace(&mut self, name: &str) -> bool {
        if self.current_namespace() != Some(name) {
            return false;
        }
        self.selection = None;
        info!(namespace = name, "namespace selection cleared");
        true
    }

    /// Clear the queue selection if `name` is the selected queue.
    ///
    /// Returns whether anything was cleared.
    pub fn forget_queue(&mut self, name: &str) -> bool {
        match &mut self.selection {
            Some(selection) if selection.queue.as_deref() == Some(name) => {
                selection.queue = None;
                info!(queue = name, "queue selection cleared");
                true
            }
            _ => false,
        }
    }

    /// Apply a handler's selection change.
    ///
    /// # Errors
    ///
    /// Propagates [`Session::select_queue`] failures.
    pub fn apply(&mut self, change: SessionChange) -> ShellResult<()> {
        match change {
            SessionChange::SelectNamespace(name) => self.select_namespace(&name),
            SessionChange::ForgetNamespace(name) => {
                self.forget_namespace(&name);
            }
            SessionChange::SelectQueue(name) => self.select_queue(&name)?,
            SessionChange::ForgetQueue(name) => {
                self.forget_queue(&name);
            }
        }
        Ok(())
    }

    /// Prompt reflecting the current selection.
    #[must_use]
    pub fn prompt(&self) -> String {
        match &self.selection {
            None => "kokaq > ".to_string(),
            Some(Selection {
                namespace,
                queue: None,
            }) => format!("kokaq [ns: {namespace}] > "),
            Some(Selection {
                namespace,
                queue: Some(queue),
            }) => format!("kokaq [ns: {namespace}] [q: {queue}] > "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_queue(namespace: &str, queue: &str) -> Session {
        let mut session = Session::new("127.0.0.1:9000");
        session.select_namespace(namespace);
        session.select_queue(queue).expect("namespace is selected");
        session
    }

    #[test]
    fn starts_empty() {
        let session = Session::new("127.0.0.1:9000");
        assert_eq!(session.address(), "127.0.0.1:9000");
        assert!(session.selection().is_none());
        assert_eq!(session.prompt(), "kokaq > ");
    }

    #[test]
    fn switching_namespace_clears_queue() {
        let mut session = with_queue("ns1", "q1");
        session.select_namespace("ns2");
        assert_eq!(session.current_namespace(), Some("ns2"));
        assert_eq!(session.current_queue(), None);
    }

    #[test]
    fn reselecting_namespace_keeps_queue() {
        let mut session = with_queue("ns1", "q1");
        session.select_namespace("ns1");
        assert_eq!(session.current_queue(), Some("q1"));
        assert_eq!(session.prompt(), "kokaq [ns: ns1] [q: q1] > ");
    }

    #[test]
    fn queue_requires_namespace() {
        let mut session = Session::new("127.0.0.1:9000");
        assert!(matches!(
            session.select_queue("q1"),
            Err(ShellError::NamespaceRequired)
        ));
        assert!(session.selection().is_none());
    }

    #[test]
    fn forgetting_other_names_keeps_selection() {
        let mut session = with_queue("ns1", "q1");
        let before = session.clone();
        assert!(!session.forget_namespace("ns2"));
        assert!(!session.forget_queue("q2"));
        assert_eq!(session, before);

        assert!(session.forget_queue("q1"));
        assert_eq!(session.prompt(), "kokaq [ns: ns1] > ");
        assert!(session.forget_namespace("ns1"));
        assert_eq!(session.prompt(), "kokaq > ");
    }

    #[test]
    fn queue_ref_needs_both_parts() {
        let mut session = Session::new("127.0.0.1:9000");
        assert!(session.queue_ref().is_none());
        session.select_namespace("acct");
        assert!(session.queue_ref().is_none());
        session.select_queue("orders").expect("namespace selected");
        assert_eq!(session.queue_ref(), Some(QueueRef::new("acct", "orders")));
    }

    #[test]
    fn apply_routes_changes() {
        let mut session = Session::new("127.0.0.1:9000");
        session
            .apply(SessionChange::SelectNamespace("acct".to_string()))
            .expect("select namespace");
        session
            .apply(SessionChange::SelectQueue("orders".to_string()))
            .expect("select queue");
        session
            .apply(SessionChange::ForgetQueue("orders".to_string()))
            .expect("forget queue");
        assert_eq!(session.current_namespace(), Some("acct"));
        assert_eq!(session.current_queue(), None);
    }
}
