// crates/daisho-cli/src/services/editor.rs - Editor Integration Service
//
// Launches the user's text editor on a file and waits for it to exit.
// `edit` uses this to let the user change an entry as a plain text document.

use anyhow::{Context as AnyhowContext, Result, anyhow, bail};
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

/// Handles text editor operations
///
/// EDITOR SELECTION HIERARCHY:
/// 1. Configured command (`[editor].command` or DAISHO_EDITOR)
/// 2. EDITOR environment variable (standard Unix)
/// 3. Platform-specific default (vi on Unix, notepad on Windows)
pub struct EditorService;

impl EditorService {
    /// Get the editor command to use for opening files
    ///
    /// EXAMPLES:
    /// ```bash
    /// export DAISHO_EDITOR="hx"           # Daisho only
    /// export EDITOR="code --wait"         # Everything, arguments allowed
    /// ```
    pub fn get_editor_command(configured: Option<&str>) -> String {
        configured
            .map(str::to_string)
            .or_else(|| env::var("EDITOR").ok())
            .filter(|cmd| !cmd.trim().is_empty())
            .unwrap_or_else(|| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "vi".to_string()
                }
            })
    }

    /// Open a file in the configured editor and wait for it to exit
    ///
    /// The command string is split on whitespace; the file path is appended
    /// as the last argument. A non-zero exit status is an error so callers
    /// never pick up a half-finished edit.
    pub fn open_file(path: &Path, configured: Option<&str>) -> Result<()> {
        let editor = Self::get_editor_command(configured);
        let mut parts = editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("Editor command is empty"))?;

        info!(editor = %editor, file = %path.display(), "launching editor");

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .status()
            .map_err(|e| anyhow!(
                "Failed to launch editor '{}': {}\n\nTips:\n- Check that '{}' is installed and in PATH\n- Set DAISHO_EDITOR or EDITOR environment variable",
                editor, e, program
            ))?;

        if !status.success() {
            bail!(
                "Editor '{}' exited with error code: {:?}",
                editor,
                status.code()
            );
        }

        Ok(())
    }

    /// Put `content` in a temporary file, let the user edit it, return the result
    pub fn edit_text(content: &str, configured: Option<&str>) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("daisho-")
            .suffix(".txt")
            .tempfile()
            .context("Failed to create temporary file for editing")?;

        file.write_all(content.as_bytes())
            .context("Failed to write temporary file for editing")?;
        file.flush()
            .context("Failed to write temporary file for editing")?;

        Self::open_file(file.path(), configured)?;

        let edited = fs::read_to_string(file.path())
            .with_context(|| format!("Failed to read edited file: {}", file.path().display()))?;
        debug!(bytes = edited.len(), "read edited document");

        Ok(edited)
    }
}
