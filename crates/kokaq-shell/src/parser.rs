//! Turning raw input lines into [`Command`] values.
//!
//! Tokens are separated by Unicode whitespace. There is no quoting: a message
//! body is the rest of the tokens rejoined with single spaces, and any quote
//! characters the operator typed are kept as-is.

use crate::command::{Command, MessageCommand, ScopeAction};
use crate::error::{ShellError, ShellResult};

const ENQUEUE_USAGE: &str = "enqueue <message> priority <uint64>";
const ACK_USAGE: &str = "ack <messageId> <lockId>";
const NACK_USAGE: &str = "nack <messageId> <lockId>";
const PEEK_USAGE: &str = "peek [count] [waitMs]";
const PRIORITY_KEYWORD: &str = "priority";

struct ScopeForms {
    verb: &'static str,
    create: &'static str,
    delete: &'static str,
    select: &'static str,
    list: &'static str,
}

const NAMESPACE_FORMS: ScopeForms = ScopeForms {
    verb: "namespace",
    create: "namespace create <name>",
    delete: "namespace delete <name>",
    select: "namespace use <name>",
    list: "namespace list",
};

const QUEUE_FORMS: ScopeForms = ScopeForms {
    verb: "queue",
    create: "queue create <name>",
    delete: "queue delete <name>",
    select: "queue use <name>",
    list: "queue list",
};

/// A verb and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// First token of the line.
    pub verb: &'a str,
    /// Remaining tokens in order.
    pub args: Vec<&'a str>,
}

/// Split a line into a verb and arguments; `None` for blank lines.
#[must_use]
pub fn tokenize(line: &str) -> Option<Invocation<'_>> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next()?;
    Some(Invocation {
        verb,
        args: tokens.collect(),
    })
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a usage, unknown-command, or number error when the line does not
/// fit the grammar.
pub fn parse_line(line: &str) -> ShellResult<Option<Command>> {
    tokenize(line).map(|invocation| parse(&invocation)).transpose()
}

/// Build a command from a tokenized line.
///
/// # Errors
///
/// See [`parse_line`].
pub fn parse(invocation: &Invocation<'_>) -> ShellResult<Command> {
    let args = invocation.args.as_slice();
    match invocation.verb {
        "namespace" => parse_scope(&NAMESPACE_FORMS, invocation).map(Command::Namespace),
        "queue" => parse_scope(&QUEUE_FORMS, invocation).map(Command::Queue),
        "enqueue" => parse_enqueue(args).map(Command::Message),
        "dequeue" => no_args(args, "dequeue", Command::Message(MessageCommand::Dequeue)),
        "ack" => parse_delivery(args, ACK_USAGE).map(|(message_id, lock_id)| {
            Command::Message(MessageCommand::Ack {
                message_id,
                lock_id,
            })
        }),
        "nack" => parse_delivery(args, NACK_USAGE).map(|(message_id, lock_id)| {
            Command::Message(MessageCommand::Nack {
                message_id,
                lock_id,
            })
        }),
        "peek" => parse_peek(args).map(Command::Message),
        "help" => no_args(args, "help", Command::Help),
        "exit" => no_args(args, "exit", Command::Exit),
        _ => Err(unknown(invocation)),
    }
}

fn parse_scope(forms: &ScopeForms, invocation: &Invocation<'_>) -> ShellResult<ScopeAction> {
    let (subcommand, rest) = invocation
        .args
        .split_first()
        .ok_or(ShellError::MissingSubcommand { verb: forms.verb })?;
    let usage = |usage| Err(ShellError::Usage { usage });
    match (*subcommand, rest) {
        ("create", [name]) => Ok(ScopeAction::Create((*name).to_string())),
        ("delete", [name]) => Ok(ScopeAction::Delete((*name).to_string())),
        ("use", [name]) => Ok(ScopeAction::Use((*name).to_string())),
        ("list", []) => Ok(ScopeAction::List),
        ("create", _) => usage(forms.create),
        ("delete", _) => usage(forms.delete),
        ("use", _) => usage(forms.select),
        ("list", _) => usage(forms.list),
        _ => Err(unknown(invocation)),
    }
}

fn parse_enqueue(args: &[&str]) -> ShellResult<MessageCommand> {
    let usage = ShellError::Usage {
        usage: ENQUEUE_USAGE,
    };
    let [body @ .., keyword, priority] = args else {
        return Err(usage);
    };
    if body.is_empty() || *keyword != PRIORITY_KEYWORD {
        return Err(usage);
    }
    let priority = priority
        .parse::<u64>()
        .map_err(|_| ShellError::InvalidPriority {
            value: (*priority).to_string(),
        })?;
    Ok(MessageCommand::Enqueue {
        body: body.join(" "),
        priority,
    })
}

fn parse_delivery(args: &[&str], usage: &'static str) -> ShellResult<(String, String)> {
    match args {
        [message_id, lock_id] => Ok(((*message_id).to_string(), (*lock_id).to_string())),
        _ => Err(ShellError::Usage { usage }),
    }
}

fn parse_peek(args: &[&str]) -> ShellResult<MessageCommand> {
    if args.len() > 2 {
        return Err(ShellError::Usage { usage: PEEK_USAGE });
    }
    let count = args.first().map_or(Ok(1), |raw| parse_count(raw))?;
    let wait_hint_ms = args.get(1).map_or(Ok(0), |raw| {
        raw.parse::<u64>().map_err(|_| ShellError::InvalidNumber {
            field: "wait",
            value: (*raw).to_string(),
            reason: "expected milliseconds as an unsigned integer",
        })
    })?;
    Ok(MessageCommand::Peek {
        count,
        wait_hint_ms,
    })
}

fn parse_count(raw: &str) -> ShellResult<u32> {
    match raw.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(ShellError::InvalidNumber {
            field: "count",
            value: raw.to_string(),
            reason: "expected a whole number of at least 1",
        }),
    }
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> ShellResult<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ShellError::Usage { usage })
    }
}

fn unknown(invocation: &Invocation<'_>) -> ShellError {
    let mut input = invocation.verb.to_string();
    for arg in &invocation.args {
        input.push(' ');
        input.push_str(arg);
    }
    ShellError::UnknownCommand { input }
}
