//! # bowtie-harness entry point
//!
//! Parses command-line arguments, sets up logging on standard error, and
//! runs the command loop over standard I/O or a replay file.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use harness_cli::{serve, ReaderSource, ReplaySource, Session};

/// Bowtie harness for the `jsonschema` crate.
///
/// Reads newline-delimited JSON commands and writes one JSON response per
/// command to standard output.
#[derive(Parser, Debug)]
#[command(name = "bowtie-harness", version, about, long_about = None)]
struct Cli {
    /// Replay commands from this file instead of standard input.
    replay: Option<PathBuf>,

    /// Enable verbose logging on standard error. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON objects.
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    std::panic::set_hook(Box::new(|info| {
        tracing::error!("{info}");
    }));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut session = Session::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.replay {
        Some(path) => {
            let mut source = ReplaySource::open(path)
                .with_context(|| format!("cannot read replay file {}", path.display()))?;
            tracing::debug!(path = %path.display(), lines = source.remaining(), "replaying commands");
            serve(&mut session, &mut source, &mut out)?;
        }
        None => {
            let stdin = io::stdin();
            let mut source = ReaderSource::new(stdin.lock());
            serve(&mut session, &mut source, &mut out)?;
        }
    }

    tracing::debug!(state = session.state().name(), "session ended");
    Ok(())
}

/// Verbosity picks the default level; `RUST_LOG` wins when set.
fn init_tracing(cli: &Cli) {
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
