//! Flags, startup, and the process exit code.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::thread;

use clap::Parser;
use kokaq_client::HttpQueueService;
use kokaq_config::defaults::{
    DEFAULT_ADDRESS, DEFAULT_DIAL_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use kokaq_config::{RawShellConfig, ShellConfig};
use kokaq_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::StartupError;
use crate::output::banner;
use crate::repl::{ExitReason, run_repl};
use crate::shell::Shell;

const INPUT_BACKLOG: usize = 1;

#[derive(Parser, Debug)]
#[command(
    name = "kokaq",
    version,
    about = "Interactive shell for a Kokaq priority-queue deployment"
)]
struct Cli {
    /// Server address: `:port`, `host:port`, or an http(s) URL.
    #[arg(long, env = "KOKAQ_ADDRESS", default_value = DEFAULT_ADDRESS)]
    address: String,
    /// Seconds allowed for establishing the connection.
    #[arg(long, env = "KOKAQ_DIAL_TIMEOUT_SECS", default_value_t = DEFAULT_DIAL_TIMEOUT_SECS)]
    dial_timeout_secs: u64,
    /// Seconds allowed for each request.
    #[arg(
        long,
        env = "KOKAQ_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,
    /// Use TLS when the address has no scheme.
    #[arg(long, env = "KOKAQ_TLS")]
    tls: bool,
    /// Log level or filter directive; `RUST_LOG` takes precedence.
    #[arg(long, env = "KOKAQ_LOG", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,
    /// Log output format: `pretty` or `json`.
    #[arg(long, env = "KOKAQ_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn raw_config(&self) -> RawShellConfig {
        RawShellConfig {
            address: self.address.clone(),
            dial_timeout_secs: self.dial_timeout_secs,
            request_timeout_secs: self.request_timeout_secs,
            tls_enabled: self.tls,
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value)
        .ok_or_else(|| format!("unknown log format '{value}' (expected pretty or json)"))
}

/// Parses flags, connects to the service, and runs the interactive loop.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match start(&cli).await {
        Ok(reason) => reason.exit_code(),
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    }
}

async fn start(cli: &Cli) -> Result<ExitReason, StartupError> {
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    })?;
    let config = ShellConfig::from_raw(&cli.raw_config())?;

    let mut out = io::stdout();
    writeln!(out, "{}", banner(&config.display_address))?;

    let service = HttpQueueService::connect(&config)
        .await
        .map_err(|source| StartupError::Connect {
            address: config.display_address.clone(),
            source,
        })?;
    info!(address = %config.address, tls = config.tls_enabled, "connected");

    let mut shell = Shell::new(config.display_address.clone(), service);
    let mut input = spawn_stdin_reader()?;
    let mut err = io::stderr();
    let reason = run_repl(
        &mut shell,
        &mut input,
        shutdown_signal(),
        &mut out,
        &mut err,
    )
    .await?;
    info!(?reason, "shell finished");
    Ok(reason)
}

/// Read stdin on a plain thread; the channel closes at end of input.
fn spawn_stdin_reader() -> io::Result<mpsc::Receiver<String>> {
    let (sender, receiver) = mpsc::channel(INPUT_BACKLOG);
    thread::Builder::new()
        .name("kokaq-stdin".to_string())
        .spawn(move || {
            if let Err(err) = forward_lines(io::stdin().lock(), &sender) {
                warn!(error = %err, "failed to read from stdin");
            }
        })?;
    Ok(receiver)
}

/// Send each line of `reader` to `sender` until end of input or until the
/// receiver goes away. Bytes that are not UTF-8 are replaced, so a bad line
/// still reaches the parser and is reported there.
fn forward_lines<R: BufRead>(mut reader: R, sender: &mpsc::Sender<String>) -> io::Result<()> {
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(());
        }
        let decoded = String::from_utf8_lossy(&buffer);
        if matches!(decoded, Cow::Owned(_)) {
            warn!("input line was not valid UTF-8; invalid bytes replaced");
        }
        let line = decoded.trim_end_matches(['\n', '\r']).to_string();
        if sender.blocking_send(line).is_err() {
            return Ok(());
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for interrupt signal");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for terminate signal");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_raw_config() {
        let cli = Cli::try_parse_from([
            "kokaq",
            "--address",
            ":7000",
            "--dial-timeout-secs",
            "2",
            "--request-timeout-secs",
            "30",
            "--tls",
            "--log-format",
            "json",
        ])
        .expect("flags should parse");
        assert_eq!(
            cli.raw_config(),
            RawShellConfig {
                address: ":7000".to_string(),
                dial_timeout_secs: 2,
                request_timeout_secs: 30,
                tls_enabled: true,
            }
        );
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let err =
            Cli::try_parse_from(["kokaq", "--log-format", "xml"]).expect_err("bad format");
        assert!(err.to_string().contains("unknown log format 'xml'"));
    }

    fn forwarded(input: &[u8]) -> Vec<String> {
        let (sender, mut receiver) = mpsc::channel(8);
        forward_lines(input, &sender).expect("in-memory reader");
        drop(sender);
        let mut lines = Vec::new();
        while let Some(line) = receiver.blocking_recv() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn invalid_utf8_line_is_forwarded_and_reading_continues() {
        let input = b"namespace list\n\xff\xfe bad\r\nnamespace list\nexit";
        let lines = forwarded(input);
        assert_eq!(
            lines,
            vec![
                "namespace list".to_string(),
                "\u{fffd}\u{fffd} bad".to_string(),
                "namespace list".to_string(),
                "exit".to_string(),
            ]
        );
    }

    #[test]
    fn reader_stops_when_receiver_is_gone() {
        let (sender, receiver) = mpsc::channel(1);
        drop(receiver);
        forward_lines(&b"help\nexit\n"[..], &sender)
            .expect("closed receiver is not an error");
    }

    #[test]
    fn zero_timeout_fails_validation() {
        let cli =
            Cli::try_parse_from(["kokaq", "--request-timeout-secs", "0"]).expect("parses");
        let err = ShellConfig::from_raw(&cli.raw_config()).expect_err("zero timeout");
        let startup = StartupError::from(err);
        assert_eq!(startup.exit_code(), 1);
        assert!(startup.to_string().starts_with("invalid configuration:"));
    }
}
