// crates/daisho-cli/src/main.rs - Daisho Entry Point
//
// Startup sequence, then hand over to the interactive shell:
//
// ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
// │ parse flags  │──▶│  bootstrap   │──▶│ open database│──▶│  REPL loop   │
// │   (clap)     │   │ config + log │   │ (conn check) │   │ (rustyline)  │
// └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//                                                                 │
//                                                                 ▼
//                                                        ┌──────────────────┐
//                                                        │ Command Handlers │
//                                                        │ (commands/*.rs)  │
//                                                        └──────────────────┘
//
// Startup failures (unreadable config, corrupt database) end the process
// with a non-zero status. Once the prompt is up, errors are printed and the
// loop continues.

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use std::io;
use tracing::{debug, info};

mod cli; // Command-line flags
mod commands; // Command implementations
mod context; // Configuration and open database shared by handlers
mod input; // Line sources for the shell
mod repl; // The read-eval-print loop
mod services; // Editor integration, logging

use cli::Cli;
use context::Context;
use daisho_core::{Bootstrap, ConfigManager, DocumentStore};
use repl::{LineEditor, Shell};

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("\n\t- Welcome to Daisho -\n");

    let home = ConfigManager::resolve_home(cli.home)?;
    let (mut config, outcome) = ConfigManager::bootstrap(&home)
        .with_context(|| format!("Failed to set up Daisho in {}", home.display()))?;

    if outcome == Bootstrap::Created {
        println!("Initial setup:");
        println!("\tCreating Daisho's configurations");
        println!("\tDone");
    }

    if let Some(db) = cli.db {
        config.database.path = db;
    }

    services::logging::init(&config, cli.verbose)?;
    info!("#### Daisho starting up ####");
    if outcome == Bootstrap::Created {
        info!(home = %home.display(), "generated configuration files");
    }
    debug!(?config, "configuration loaded");

    println!("\nOpening database at {}.", config.database.path.display());
    let store = DocumentStore::open(&config.database.path).with_context(|| {
        format!(
            "Daisho requires a readable database at {}\nCheck the file, or move it aside to start with an empty one",
            config.database.path.display()
        )
    })?;
    println!("Connection successful.");

    let history = config.global.history.clone();
    let ctx = Context::new(config, store);

    commands::print_usage(&mut io::stdout())?;

    let editor = LineEditor::new(&history)?;
    let mut shell = Shell::new(ctx, editor, io::stdout());
    shell.run()?;

    info!("#### Daisho exiting ####");
    Ok(())
}
