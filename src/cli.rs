use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context};
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cmd::Commands;

/// Local-first task planner.
/// Tasks live in a JSON file under the data directory (see --data-dir).
#[derive(Parser)]
#[command(name = "pp", version, about = "Pocket Planner: local-first tasks in the terminal")]
pub struct Cli {
    /// Directory holding the task store and log file.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (-q warn, -qq error).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Level used when RUST_LOG is not set.
pub fn default_log_level(verbose: u8, quiet: u8) -> &'static str {
    if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber. With `log_file`, output is appended there
/// instead of stderr.
pub fn init_tracing(verbose: u8, quiet: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_log_level(verbose, quiet)))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true);

    let init_result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(default_log_level(0, 0), "warn");
        assert_eq!(default_log_level(2, 0), "debug");
        assert_eq!(default_log_level(5, 0), "trace");
        assert_eq!(default_log_level(3, 2), "error");
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["pp", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 2);
    }
}
