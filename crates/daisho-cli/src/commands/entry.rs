// crates/daisho-cli/src/commands/entry.rs - Single entry commands
//
// `open <kind> <n>` prints everything about one entry.
// `edit <kind> <n>` hands the entry to the user's editor as a plain text
// document and stores the result.

use anyhow::Result;
use console::style;
use daisho_core::entry::format_date;
use daisho_core::{EntryKind, Selector};
use std::io::Write;
use tracing::{info, warn};

use crate::context::Context;
use crate::services::EditorService;

/// Handle `open <kind> <n>`
pub fn open(ctx: &Context, out: &mut dyn Write, selector: Selector) -> Result<()> {
    let entry = ctx.store.resolve(selector)?;

    writeln!(
        out,
        "\n📄 {} #{}: {}",
        capitalize(&entry.kind.to_string()),
        selector.number,
        style(&entry.title).bold()
    )?;
    writeln!(out, "{}", "─".repeat(50))?;

    if entry.kind == EntryKind::Task {
        let status = if entry.done { "done" } else { "pending" };
        writeln!(out, "Status:   {}", status)?;
    }
    if let Some(due) = entry.due {
        writeln!(out, "Due:      {}", format_date(due))?;
    }
    if let Some(priority) = entry.priority {
        writeln!(out, "Priority: {}", priority)?;
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        writeln!(out, "Tags:     {}", tags.join(" "))?;
    }
    writeln!(
        out,
        "Created:  {}",
        entry.created.with_timezone(&chrono::Local).format("%d-%m-%Y %H:%M")
    )?;
    writeln!(
        out,
        "Updated:  {}",
        entry.updated.with_timezone(&chrono::Local).format("%d-%m-%Y %H:%M")
    )?;

    if !entry.body.is_empty() {
        writeln!(out, "\n{}", entry.body)?;
    }
    writeln!(out)?;

    Ok(())
}

/// Handle `edit <kind> <n>`
///
/// An edit that fails to parse is reported and discarded; the stored entry
/// only changes when the whole document is valid.
pub fn edit(ctx: &mut Context, out: &mut dyn Write, selector: Selector) -> Result<()> {
    let mut entry = ctx.store.resolve(selector)?.clone();

    writeln!(out, "\nEditing {}: #{}\n", entry.kind, selector.number)?;
    let edited = EditorService::edit_text(
        &entry.render_document(),
        ctx.config().editor.command.as_deref(),
    )?;

    match entry.apply_document(&edited) {
        Ok(true) => {
            let id = entry.id;
            ctx.store.update(entry)?;
            info!(%id, %selector, "edited entry");
            writeln!(out, "{} Updated {}\n", style("✅").green(), selector)?;
        }
        Ok(false) => {
            writeln!(out, "No changes.\n")?;
        }
        Err(e) => {
            warn!(%selector, error = %e, "discarding invalid edit");
            writeln!(
                out,
                "{} {}. The {} was not changed.\n",
                style("❌").red(),
                e,
                selector.kind
            )?;
        }
    }

    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
