//! The read-eval-print loop.
//!
//! Input lines arrive on a channel fed by a dedicated reader, so a pending
//! read never holds up shutdown. Each iteration races the shutdown future
//! first against the next line and then against the dispatched command;
//! dropping the command future cancels its in-flight remote call.

use std::future::Future;
use std::io::{self, Write};

use kokaq_core::QueueService;
use tokio::sync::mpsc;
use tracing::info;

use crate::shell::Shell;

/// Farewell printed when a termination signal ends the loop.
pub const SIGNAL_FAREWELL: &str = "Exiting Kokaq REPL...";

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The operator entered `exit`.
    Command,
    /// The input stream closed.
    EndOfInput,
    /// A termination signal arrived.
    Signal,
}

impl ExitReason {
    /// Process exit code for this way of leaving.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Command | Self::EndOfInput | Self::Signal => 0,
        }
    }
}

/// Drive `shell` until `exit`, end of input, or `shutdown` resolves.
///
/// Replies go to `out`, one `error: ` line per failed command goes to `err`.
/// The service connection is closed on every path out of the loop.
///
/// # Errors
///
/// Returns an error only when writing to `out` or `err` fails.
pub async fn run_repl<S, F, O, E>(
    shell: &mut Shell<S>,
    input: &mut mpsc::Receiver<String>,
    shutdown: F,
    out: &mut O,
    err: &mut E,
) -> io::Result<ExitReason>
where
    S: QueueService,
    F: Future<Output = ()> + Send,
    O: Write + Send,
    E: Write + Send,
{
    let result = drive(shell, input, shutdown, out, err).await;
    shell.close().await;
    result
}

async fn drive<S, F, O, E>(
    shell: &mut Shell<S>,
    input: &mut mpsc::Receiver<String>,
    shutdown: F,
    out: &mut O,
    err: &mut E,
) -> io::Result<ExitReason>
where
    S: QueueService,
    F: Future<Output = ()> + Send,
    O: Write + Send,
    E: Write + Send,
{
    tokio::pin!(shutdown);
    loop {
        write!(out, "{}", shell.prompt())?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            () = &mut shutdown => return signal_farewell(out),
            next = input.recv() => {
                let Some(line) = next else {
                    writeln!(out)?;
                    return Ok(ExitReason::EndOfInput);
                };
                line
            }
        };

        let result = tokio::select! {
            biased;
            () = &mut shutdown => return signal_farewell(out),
            result = shell.execute(&line) => result,
        };

        match result {
            Ok(outcome) => {
                for reply in &outcome.lines {
                    writeln!(out, "{reply}")?;
                }
                if outcome.is_exit() {
                    return Ok(ExitReason::Command);
                }
            }
            Err(error) => writeln!(err, "error: {error}")?,
        }
    }
}

fn signal_farewell<O: Write>(out: &mut O) -> io::Result<ExitReason> {
    info!("termination signal received");
    writeln!(out)?;
    writeln!(out, "{SIGNAL_FAREWELL}")?;
    Ok(ExitReason::Signal)
}
