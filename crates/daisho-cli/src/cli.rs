use clap::Parser;
use std::path::PathBuf;

/// Main CLI structure
///
/// Daisho is interactive: these flags only shape how the shell starts.
#[derive(Parser, Debug)]
#[command(name = "daisho")]
#[command(about = "An interactive note and task manager")]
#[command(version)]
pub struct Cli {
    /// Daisho home directory (overrides DAISHO_HOME)
    #[arg(long, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Database file to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
