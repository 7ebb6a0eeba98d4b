// crates/daisho-cli/src/input.rs - Where the shell gets its lines from
//
// Both the main `daisho ->>` prompt and the follow-up questions asked by
// `add` read through LineSource. The real shell uses rustyline; tests feed
// a fixed script of lines.

use anyhow::Result;

/// One read from a line source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C: abandon the current line
    Interrupted,
    /// Ctrl-D or end of piped input
    Eof,
}

/// Source of input lines
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Input>;

    /// Record a command line in history
    fn remember(&mut self, _line: &str) {}

    /// Called once when the shell exits
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Ask a follow-up question, trimming the answer
///
/// Returns None when the user interrupts or input ends.
pub fn ask(input: &mut dyn LineSource, prompt: &str) -> Result<Option<String>> {
    match input.read_line(prompt)? {
        Input::Line(line) => Ok(Some(line.trim().to_string())),
        Input::Interrupted | Input::Eof => Ok(None),
    }
}

#[cfg(test)]
pub use scripted::ScriptedInput;
