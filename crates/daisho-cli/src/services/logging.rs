// crates/daisho-cli/src/services/logging.rs - Log file setup
//
// The terminal belongs to the REPL, so all tracing output goes to the log
// file named in the config (`<home>/daisho.log` by default).

use anyhow::{Context as AnyhowContext, Result, anyhow};
use std::fs::OpenOptions;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Level;

use daisho_core::DaishoConfig;

/// Install the global subscriber writing to the configured log file
///
/// `verbose` forces debug level regardless of `[log].level`.
pub fn init(config: &DaishoConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.log.level)
            .map_err(|_| anyhow!("Invalid log level '{}'", config.log.level))?
    };

    let log_path = &config.global.log_file;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
