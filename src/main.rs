//! # PP - Pocket Planner
//!
//! A local-first task planner for the terminal: add, edit, filter, sort and
//! complete to-do items, persisted as a JSON file in your data directory.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! pp
//!
//! # Add a task from the shell
//! pp add "File taxes" --priority high --due "end of month"
//!
//! # List open tasks by due date
//! pp list --filter open --sort due --dir asc
//!
//! # Tick one off by title or id prefix
//! pp toggle "File taxes"
//! ```
//!
//! ## Key Commands
//!
//! - `pp ui` - Interactive task list (the default)
//! - `pp add <title>` - Create a task
//! - `pp list` - Search, filter and sort tasks, with completion
//! - `pp edit <id>` - Change title, description, due date or priority
//! - `pp toggle <id>` / `pp remove <id>` - Complete or delete
//! - `pp clear` - Delete every task
//!
//! Tasks are stored in `pp_tasks.json` under the platform data directory
//! (e.g. `~/.local/share/pocket-planner/`) or the directory given with
//! `--data-dir`. A missing or unreadable file simply starts an empty list.

use clap::Parser;
use tracing::info;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod dates;
pub mod display;
pub mod fields;
pub mod planner;
pub mod session;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use session::Session;
use store::FileStorage;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::resolve(cli.data_dir.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Ui);

    // The UI owns the terminal, so its logs go to a file.
    let log_file = matches!(command, Commands::Ui).then(|| config.log_path());
    cli::init_tracing(cli.verbose, cli.quiet, log_file.as_deref())?;
    info!(data_dir = %config.data_dir.display(), "starting pocket planner");

    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let storage = FileStorage::open(&config.data_dir)?;
    let mut session = Session::open(storage, config.tasks_key());

    match command {
        Commands::Ui => tui::run::run_tui(session)?,
        Commands::Add { title, desc, due, priority } =>
            cmd_add(&mut session, title, desc, due, priority)?,
        Commands::List { search, filter, sort, dir, limit } =>
            cmd_list(&mut session, search, filter, sort, dir, limit),
        Commands::View { id } => cmd_view(&session, id),
        Commands::Toggle { id } => cmd_toggle(&mut session, id),
        Commands::Remove { id } => cmd_remove(&mut session, id),
        Commands::Edit { id, title, desc, due, clear_due, priority } =>
            cmd_edit(&mut session, id, title, desc, due, clear_due, priority),
        Commands::Stats => cmd_stats(&session),
        Commands::Clear { yes } => cmd_clear(&mut session, yes)?,
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
    Ok(())
}
