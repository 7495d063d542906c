//! Banner, help text, and reply renderers.

use kokaq_core::{DeliveredMessage, MessageReceipt};

pub(crate) const EXIT_FAREWELL: &str = "Bye!";
pub(crate) const NO_MESSAGES: &str = "No messages available";

const HELP: &str = "\
Commands:
  namespace create <name>            create a namespace and select it
  namespace delete <name>            delete a namespace
  namespace use <name>               select an existing namespace
  namespace list                     list namespaces
  queue create <name>                create a queue in the selected namespace and select it
  queue delete <name>                delete a queue from the selected namespace
  queue use <name>                   select an existing queue
  queue list                         list queues in the selected namespace
  enqueue <message> priority <p>     send a message; higher priorities are delivered first
  dequeue                            receive one message and lock it
  ack <messageId> <lockId>           acknowledge a received message
  nack <messageId> <lockId>          return a received message for redelivery
  peek [count] [waitMs]              view the most urgent messages without consuming them
  help                               show this help
  exit                               leave the shell

Notes:
  Select a namespace with 'namespace use' and then a queue with 'queue use'
  before sending, receiving, acknowledging or peeking messages.
  'queue ...' commands act on the selected namespace.";

pub(crate) fn banner(address: &str) -> String {
    format!(
        "Welcome to the Kokaq shell.\n\
         Connecting to {address} ...\n\
         Type 'help' for commands, 'exit' to quit."
    )
}

pub(crate) fn help_lines() -> Vec<String> {
    HELP.lines().map(str::to_string).collect()
}

pub(crate) fn render_names(label: &str, names: &[String]) -> String {
    if names.is_empty() {
        format!("{label}: (none)")
    } else {
        format!("{label}: {}", names.join(", "))
    }
}

pub(crate) fn render_receipt(receipt: &MessageReceipt, priority: u64) -> String {
    format!(
        "Enqueued message: {}, Priority: {priority}",
        receipt.message_id
    )
}

pub(crate) fn render_dequeued(message: &DeliveredMessage) -> String {
    format!(
        "Dequeued message: {}, Priority: {}, Lock: {}, Body: {}",
        message.message_id,
        message.priority,
        message.lock_id,
        message.body_text()
    )
}

pub(crate) fn render_peeked(message: &DeliveredMessage) -> String {
    format!(
        "Peeked message: {}, Priority: {}",
        message.message_id, message.priority
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokaq_test_support::fixtures::delivered;

    fn message(body: &[u8]) -> DeliveredMessage {
        DeliveredMessage {
            body: body.to_vec(),
            ..delivered("m-7", "l-3", 9, "")
        }
    }

    #[test]
    fn names_render_with_placeholder() {
        assert_eq!(render_names("Namespaces", &[]), "Namespaces: (none)");
        assert_eq!(
            render_names("Queues", &["a".to_string(), "b".to_string()]),
            "Queues: a, b"
        );
    }

    #[test]
    fn dequeued_renders_lossy_body() {
        assert_eq!(
            render_dequeued(&message(b"ship it")),
            "Dequeued message: m-7, Priority: 9, Lock: l-3, Body: ship it"
        );
        assert_eq!(
            render_dequeued(&message(&[0x66, 0xff])),
            "Dequeued message: m-7, Priority: 9, Lock: l-3, Body: f\u{fffd}"
        );
    }

    #[test]
    fn peeked_shows_id_and_priority_only() {
        assert_eq!(
            render_peeked(&delivered("m-2", "", 4, "secret")),
            "Peeked message: m-2, Priority: 4"
        );
    }

    #[test]
    fn banner_names_the_address() {
        let lines: Vec<_> = banner(":9000").lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Connecting to :9000 ...");
    }

    #[test]
    fn help_lists_every_verb() {
        let help = help_lines().join("\n");
        for verb in [
            "namespace create",
            "queue list",
            "enqueue",
            "dequeue",
            "ack",
            "nack",
            "peek",
            "help",
            "exit",
        ] {
            assert!(help.contains(verb), "help is missing {verb}");
        }
        assert!(help.contains("Notes:"));
        assert!(help.contains("'namespace use' and then a queue with 'queue use'"));
    }
}
