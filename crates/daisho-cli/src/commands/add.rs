// crates/daisho-cli/src/commands/add.rs - Interactive note/task creation
//
// `add note` and `add task` ask a short series of questions at the prompt.
// A blank title, Ctrl-C or Ctrl-D at any question abandons the entry.
// Invalid tags, priorities and dates are reported and asked again.

use anyhow::Result;
use console::style;
use daisho_core::entry::{parse_date, parse_tags};
use daisho_core::{Entry, EntryKind, Priority};
use std::io::Write;
use tracing::info;

use crate::context::Context;
use crate::input::{LineSource, ask};

/// Handle `add <kind>`
pub fn handle(
    ctx: &mut Context,
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    kind: EntryKind,
) -> Result<()> {
    let Some(entry) = collect_entry(input, out, kind)? else {
        writeln!(out, "Nothing added.\n")?;
        return Ok(());
    };

    let title = entry.title.clone();
    let id = ctx.store.insert(entry)?;
    let number = ctx.store.number_of(id).unwrap_or_default();
    info!(%id, %kind, number, "added entry");

    writeln!(
        out,
        "{} Added {} #{}: {}\n",
        style("✅").green(),
        kind,
        number,
        title
    )?;
    Ok(())
}

/// Ask the questions for a new entry; None when the user gives up
fn collect_entry(
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    kind: EntryKind,
) -> Result<Option<Entry>> {
    let Some(title) = ask(input, "  Title: ")? else {
        return Ok(None);
    };
    if title.is_empty() {
        return Ok(None);
    }
    let mut entry = Entry::new(kind, &title)?;

    let Some(body) = ask(input, "  Body: ")? else {
        return Ok(None);
    };
    entry.set_body(&body);

    let Some(tags) = ask_until_valid(input, out, "  Tags: ", parse_tags)? else {
        return Ok(None);
    };
    entry.tags = tags;

    let Some(priority) = ask_until_valid(
        input,
        out,
        "  Priority (#high, #med, #low, blank for none): ",
        |answer| match answer {
            "" => Ok(None),
            value => value.parse::<Priority>().map(Some),
        },
    )?
    else {
        return Ok(None);
    };
    entry.priority = priority;

    if kind == EntryKind::Task {
        let Some(due) = ask_until_valid(
            input,
            out,
            "  Due date (DD-MM-YYYY, blank for none): ",
            |answer| match answer {
                "" => Ok(None),
                value => parse_date(value).map(Some),
            },
        )?
        else {
            return Ok(None);
        };
        entry.due = due;
    }

    Ok(Some(entry))
}

/// Repeat a question until `parse` accepts the answer
fn ask_until_valid<T, E: std::fmt::Display>(
    input: &mut dyn LineSource,
    out: &mut dyn Write,
    prompt: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<Option<T>> {
    loop {
        let Some(answer) = ask(input, prompt)? else {
            return Ok(None);
        };
        match parse(&answer) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => writeln!(out, "  {} {}", style("❌").red(), e)?,
        }
    }
}
