use anyhow::Result;
use daisho_core::Selector;
use std::io::Write;
use tracing::info;

use crate::context::Context;

/// Handle `rm <kind> <n>`: move the entry to the trash
///
/// Trashed entries stay in the database and show up under `list trash`.
pub fn trash(ctx: &mut Context, out: &mut dyn Write, selector: Selector) -> Result<()> {
    let entry = ctx.store.resolve(selector)?;
    let (id, title) = (entry.id, entry.title.clone());

    ctx.store.trash(id)?;
    info!(%id, %selector, "moved entry to trash");

    writeln!(out, "🗑  Moved {} to the trash: {}\n", selector, title)?;
    Ok(())
}

/// Handle `del <kind> <n>`: remove the entry from the database
pub fn delete(ctx: &mut Context, out: &mut dyn Write, selector: Selector) -> Result<()> {
    let id = ctx.store.resolve(selector)?.id;

    let removed = ctx.store.delete(id)?;
    info!(%id, %selector, "deleted entry");

    writeln!(out, "Deleted {} permanently: {}\n", selector, removed.title)?;
    Ok(())
}
