//! The closed set of commands understood by the shell.
//!
//! Commands are grouped by the selection they need: `Namespace` actions run
//! anywhere, `Queue` actions need a namespace, and `Message` commands need a
//! namespace and a queue. [`crate::guard`] enforces that split.

/// Subcommand shared by `namespace` and `queue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeAction {
    /// Create the named resource and select it.
    Create(String),
    /// Delete the named resource.
    Delete(String),
    /// Select an existing resource.
    Use(String),
    /// Enumerate resources.
    List,
}

impl ScopeAction {
    /// Subcommand keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Delete(_) => "delete",
            Self::Use(_) => "use",
            Self::List => "list",
        }
    }
}

/// Message operations against the selected queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageCommand {
    /// Send `body` with `priority`.
    Enqueue {
        /// Message text, tokens rejoined with single spaces.
        body: String,
        /// Delivery priority; higher is more urgent.
        priority: u64,
    },
    /// Receive one message and lock it.
    Dequeue,
    /// Acknowledge a delivery.
    Ack {
        /// Delivered message identifier.
        message_id: String,
        /// Lock issued with the delivery.
        lock_id: String,
    },
    /// Negatively acknowledge a delivery, allowing redelivery.
    Nack {
        /// Delivered message identifier.
        message_id: String,
        /// Lock issued with the delivery.
        lock_id: String,
    },
    /// View the most urgent messages without consuming them.
    Peek {
        /// Maximum number of messages, at least one.
        count: u32,
        /// How long the service may wait for a message, in milliseconds.
        wait_hint_ms: u64,
    },
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `namespace <action>`.
    Namespace(ScopeAction),
    /// `queue <action>` inside the selected namespace.
    Queue(ScopeAction),
    /// `enqueue`, `dequeue`, `ack`, `nack`, `peek` on the selected queue.
    Message(MessageCommand),
    /// Print the usage guide.
    Help,
    /// Leave the shell.
    Exit,
}

impl Command {
    /// Verb the command was entered with.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Namespace(_) => "namespace",
            Self::Queue(_) => "queue",
            Self::Message(MessageCommand::Enqueue { .. }) => "enqueue",
            Self::Message(MessageCommand::Dequeue) => "dequeue",
            Self::Message(MessageCommand::Ack { .. }) => "ack",
            Self::Message(MessageCommand::Nack { .. }) => "nack",
            Self::Message(MessageCommand::Peek { .. }) => "peek",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}
