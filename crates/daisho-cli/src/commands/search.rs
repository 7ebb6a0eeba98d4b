// crates/daisho-cli/src/commands/search.rs - Keyword Search Command
//
// Case-insensitive substring search over titles, bodies and tags of every
// entry that is not in the trash.

use anyhow::Result;
use std::io::Write;
use tracing::debug;

use crate::commands::list::summary_line;
use crate::context::Context;

/// Search notes and tasks for `keyword`
pub fn handle(ctx: &Context, out: &mut dyn Write, keyword: &str) -> Result<()> {
    let hits = ctx.store.search(keyword);
    debug!(keyword, hits = hits.len(), "search");

    writeln!(out, "🔍 Searching for: {}", keyword)?;

    if hits.is_empty() {
        writeln!(out, "No matches.\n")?;
        return Ok(());
    }

    for entry in hits {
        let number = ctx.store.number_of(entry.id);
        writeln!(out, "{:<5}{}", entry.kind.to_string(), summary_line(number, entry))?;
    }
    writeln!(out)?;

    Ok(())
}
