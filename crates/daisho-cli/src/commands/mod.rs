// crates/daisho-cli/src/commands/mod.rs - Command Handler Modules
//
// One module per command family. `dispatch` maps a parsed Command to its
// handler; handlers write to the given writer so they can be tested
// without a terminal.
//
// MODULE ORGANIZATION:
// - add:    interactive creation of notes and tasks
// - list:   filtered listings
// - entry:  open (show) and edit a single entry
// - remove: rm (trash) and del (permanent)
// - search: keyword search

use anyhow::Result;
use daisho_core::Command;
use daisho_core::command::USAGE;
use std::io::Write;

use crate::context::Context;
use crate::input::LineSource;

pub mod add;
pub mod entry;
pub mod list;
pub mod remove;
pub mod search;

/// What the shell does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command
pub fn dispatch(
    ctx: &mut Context,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    cmd: Command,
) -> Result<Flow> {
    match cmd {
        Command::Empty => {}
        Command::Add(kind) => add::handle(ctx, input, out, kind)?,
        Command::List(filter) => list::handle(ctx, out, &filter)?,
        Command::Open(selector) => entry::open(ctx, out, selector)?,
        Command::Edit(selector) => entry::edit(ctx, out, selector)?,
        Command::Remove(selector) => remove::trash(ctx, out, selector)?,
        Command::Delete(selector) => remove::delete(ctx, out, selector)?,
        Command::Search(keyword) => search::handle(ctx, out, &keyword)?,
        Command::Help | Command::Unknown(_) => print_usage(out)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub fn print_usage(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", USAGE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::temp_context;
    use crate::input::ScriptedInput;

    fn run(ctx: &mut Context, line: &str) -> (Flow, String) {
        let mut input = ScriptedInput::new(&[]);
        let mut out = Vec::new();
        let cmd = Command::parse(line).unwrap();
        let flow = dispatch(ctx, &mut input, &mut out, cmd).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_help_and_unknown_print_usage() {
        let (_temp, mut ctx) = temp_context();

        let (flow, text) = run(&mut ctx, "help");
        assert_eq!(flow, Flow::Continue);
        assert!(text.contains("Usage:"));

        let (_, text) = run(&mut ctx, "launch rockets");
        assert!(text.contains("Usage:"));
    }

    #[test]
    fn test_quit_and_empty() {
        let (_temp, mut ctx) = temp_context();
        assert_eq!(run(&mut ctx, "quit").0, Flow::Quit);

        let (flow, text) = run(&mut ctx, "   ");
        assert_eq!(flow, Flow::Continue);
        assert!(text.is_empty());
    }
}
