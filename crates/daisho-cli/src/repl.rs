// crates/daisho-cli/src/repl.rs - The `daisho ->>` read-eval-print loop
//
// Reads a line, parses it into a Command, dispatches it, repeats. Bad
// arguments print the command's usage text and the loop simply asks again.
// Nothing typed at the prompt ends the session except `quit` or Ctrl-D.
//
// Line editing, history and tab completion come from rustyline.

use anyhow::{Context as AnyhowContext, Result};
use console::style;
use daisho_core::Command;
use daisho_core::command::{COMMANDS, KINDS, LIST_FILTERS};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Editor, Helper};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::commands::{self, Flow};
use crate::context::Context;
use crate::input::{Input, LineSource};

pub const PROMPT: &str = "daisho ->> ";

const PRIORITIES: [&str; 3] = ["#high", "#med", "#low"];

/// Candidate words for the token under the cursor
///
/// Returns the byte offset where the token starts and the matching words.
pub fn complete_words(line: &str, pos: usize) -> (usize, Vec<&'static str>) {
    let before = &line[..pos];
    let start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let partial = before[start..].to_lowercase();

    let previous: Vec<String> = before[..start]
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let previous: Vec<&str> = previous.iter().map(String::as_str).collect();

    let words: &[&'static str] = match previous.as_slice() {
        [] => &COMMANDS,
        ["add" | "edit" | "open" | "rm" | "del"] => &KINDS,
        ["list"] => &LIST_FILTERS,
        ["list", "prio"] => &PRIORITIES,
        _ => &[],
    };

    let matches = words
        .iter()
        .copied()
        .filter(|w| w.starts_with(&partial))
        .collect();
    (start, matches)
}

/// rustyline helper: completion only
pub struct DaishoHelper;

impl Completer for DaishoHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = complete_words(line, pos);
        let candidates = words
            .into_iter()
            .map(|w| Pair {
                display: w.to_string(),
                replacement: format!("{} ", w),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for DaishoHelper {
    type Hint = String;
}

impl Highlighter for DaishoHelper {}

impl Validator for DaishoHelper {}

impl Helper for DaishoHelper {}

/// rustyline editor with a file-backed history
pub struct LineEditor {
    editor: Editor<DaishoHelper, FileHistory>,
    history_path: PathBuf,
}

impl LineEditor {
    pub fn new(history_path: &Path) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .history_ignore_dups(true)?
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();

        let mut editor: Editor<DaishoHelper, FileHistory> =
            Editor::with_config(config).context("Failed to initialize line editor")?;
        editor.set_helper(Some(DaishoHelper));

        if history_path.exists() {
            if let Err(e) = editor.load_history(history_path) {
                warn!(path = %history_path.display(), error = %e, "could not load history");
            }
        }

        Ok(Self {
            editor,
            history_path: history_path.to_path_buf(),
        })
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Input::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e).context("Failed to read input"),
        }
    }

    fn remember(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Err(e) = self.editor.add_history_entry(line) {
            warn!(error = %e, "could not add history entry");
        }
    }

    fn finish(&mut self) -> Result<()> {
        self.editor
            .save_history(&self.history_path)
            .with_context(|| format!("Failed to save history: {}", self.history_path.display()))
    }
}

/// The interactive shell
pub struct Shell<I: LineSource, W: Write> {
    ctx: Context,
    input: I,
    out: W,
}

impl<I: LineSource, W: Write> Shell<I, W> {
    pub fn new(ctx: Context, input: I, out: W) -> Self {
        Self { ctx, input, out }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        info!("started Daisho prompt");

        loop {
            let line = match self.input.read_line(PROMPT)? {
                Input::Line(line) => line,
                Input::Interrupted => continue,
                Input::Eof => break,
            };
            self.input.remember(&line);

            let cmd = match Command::parse(&line) {
                Ok(cmd) => cmd,
                Err(usage) => {
                    info!(line = %line.trim(), "usage error");
                    writeln!(self.out, "{}\n", usage)?;
                    continue;
                }
            };

            if cmd != Command::Empty {
                info!(command = cmd.name(), "dispatching command");
            }

            match commands::dispatch(&mut self.ctx, &mut self.input, &mut self.out, cmd) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) => {
                    let message = format!("{:#}", e);
                    warn!(error = %message, "command failed");
                    writeln!(self.out, "{} {}\n", style("❌").red(), message)?;
                }
            }
        }

        writeln!(self.out, "\nExiting Daisho.\n")?;
        self.out.flush()?;
        self.input.finish()?;
        info!("Daisho prompt closed");
        Ok(())
    }
}

#[cfg(test)]
impl<I: LineSource, W: Write> Shell<I, W> {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::temp_context;
    use crate::input::ScriptedInput;

    fn run_script(lines: &[&str]) -> (tempfile::TempDir, Shell<ScriptedInput, Vec<u8>>) {
        let (temp, ctx) = temp_context();
        let mut shell = Shell::new(ctx, ScriptedInput::new(lines), Vec::new());
        shell.run().unwrap();
        (temp, shell)
    }

    fn output(shell: &Shell<ScriptedInput, Vec<u8>>) -> String {
        String::from_utf8(shell.output().clone()).unwrap()
    }

    #[test]
    fn test_complete_command_words() {
        assert_eq!(complete_words("", 0), (0, COMMANDS.to_vec()));
        assert_eq!(complete_words("li", 2), (0, vec!["list"]));
        assert_eq!(complete_words("  DE", 4), (2, vec!["del"]));
        assert_eq!(complete_words("zz", 2), (0, vec![]));
    }

    #[test]
    fn test_complete_arguments() {
        assert_eq!(complete_words("add ", 4), (4, vec!["note", "task"]));
        assert_eq!(complete_words("edit t", 6), (5, vec!["task"]));
        assert_eq!(complete_words("list to", 7), (5, vec!["today", "tomorrow"]));
        assert_eq!(complete_words("list prio #h", 12), (10, vec!["#high"]));
        assert_eq!(complete_words("edit note ", 10), (10, vec![]));
    }

    #[test]
    fn test_usage_errors_keep_the_loop_going() {
        let (_temp, shell) = run_script(&["add", "edit note", "help"]);
        let text = output(&shell);

        assert!(text.contains("`add` takes either `note` or `task`, as argument."));
        assert!(text.contains("`edit` accepts `note` or `task`, and a number."));
        assert!(text.contains("Usage:"));
        assert!(text.trim_end().ends_with("Exiting Daisho."));
    }

    #[test]
    fn test_quit_stops_reading() {
        let (_temp, shell) = run_script(&["quit", "add note"]);
        assert_eq!(shell.input().prompts, vec![PROMPT.to_string()]);
        assert_eq!(shell.input().remembered, vec!["quit".to_string()]);
    }

    #[test]
    fn test_handler_errors_are_reported() {
        let (_temp, shell) = run_script(&["open task 9", "list"]);
        let text = output(&shell);
        assert!(text.contains("There is no task #9 in the list"));
        assert!(text.contains("Nothing to list (all)."));
    }

    #[test]
    fn test_full_session() {
        let (_temp, shell) = run_script(&[
            "add task",
            "Return library books",
            "",
            "#errands",
            "#med",
            "",
            "add note",
            "Reading list",
            "Dune, Piranesi",
            "books",
            "",
            "list",
            "rm task 1",
            "list trash",
            "search piranesi",
            "quit",
        ]);
        let text = output(&shell);

        assert!(text.contains("Added task #1: Return library books"));
        assert!(text.contains("Added note #1: Reading list"));
        assert!(text.contains("1. [ ] Return library books  #med  (#errands)"));
        assert!(text.contains("Moved task #1 to the trash: Return library books"));
        assert!(text.contains("- [ ] Return library books"));
        assert!(text.contains("1. Reading list  (#books)"));

        let entries = shell.context().store.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.trashed));
    }
}
