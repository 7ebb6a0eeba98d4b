use anyhow::Result;
use console::style;
use daisho_core::entry::format_date;
use daisho_core::{Entry, EntryKind, ListFilter};
use std::io::Write;

use crate::context::Context;

/// List entries matching `filter`, notes first, then tasks
///
/// Numbers are the ones `edit`/`open`/`rm`/`del` accept. Trashed entries
/// have no number and show `-` instead.
pub fn handle(ctx: &Context, out: &mut dyn Write, filter: &ListFilter) -> Result<()> {
    let entries = ctx.store.find(filter, ctx.today());

    if entries.is_empty() {
        writeln!(out, "Nothing to list ({}).\n", filter)?;
        return Ok(());
    }

    for kind in EntryKind::ALL {
        let section: Vec<&Entry> = entries.iter().copied().filter(|e| e.kind == kind).collect();
        if section.is_empty() {
            continue;
        }

        writeln!(out, "\n{}:", style(kind.heading()).bold())?;
        for entry in section {
            let number = ctx.store.number_of(entry.id);
            writeln!(out, "{}", summary_line(number, entry))?;
        }
    }
    writeln!(out)?;

    Ok(())
}

/// One-line summary: number, checkbox for tasks, title, due, priority, tags
pub fn summary_line(number: Option<usize>, entry: &Entry) -> String {
    let number = number
        .map(|n| format!("{}.", n))
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!("  {:>4} ", number);
    if entry.kind == EntryKind::Task {
        line.push_str(if entry.done { "[x] " } else { "[ ] " });
    }
    line.push_str(&entry.title);

    if let Some(due) = entry.due {
        line.push_str(&format!("  due {}", format_date(due)));
    }
    if let Some(priority) = entry.priority {
        line.push_str(&format!("  {}", priority));
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        line.push_str(&format!("  ({})", tags.join(" ")));
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::temp_context;
    use chrono::{Duration, NaiveDate, Utc};
    use daisho_core::Priority;

    fn insert(ctx: &mut Context, kind: EntryKind, title: &str, age_minutes: i64) -> Entry {
        let mut entry = Entry::new(kind, title).unwrap();
        entry.created = Utc::now() - Duration::minutes(age_minutes);
        ctx.store.insert(entry.clone()).unwrap();
        entry
    }

    fn list(ctx: &Context, filter: ListFilter) -> String {
        let mut out = Vec::new();
        handle(ctx, &mut out, &filter).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_line_formats_task() {
        let mut task = Entry::new(EntryKind::Task, "File taxes").unwrap();
        task.due = NaiveDate::from_ymd_opt(2027, 4, 15);
        task.priority = Some(Priority::High);
        task.tags = vec!["money".to_string(), "gov".to_string()];

        assert_eq!(
            summary_line(Some(3), &task),
            "    3. [ ] File taxes  due 15-04-2027  #high  (#money #gov)"
        );

        task.done = true;
        assert!(summary_line(None, &task).starts_with("     - [x] File taxes"));
    }

    #[test]
    fn test_list_groups_by_kind() {
        let (_temp, mut ctx) = temp_context();
        insert(&mut ctx, EntryKind::Task, "Walk dog", 2);
        insert(&mut ctx, EntryKind::Note, "Poem draft", 1);

        let text = list(&ctx, ListFilter::All);
        let notes_at = text.find("Notes").unwrap();
        let tasks_at = text.find("Tasks").unwrap();
        assert!(notes_at < tasks_at);
        assert!(text.contains("1. Poem draft"));
        assert!(text.contains("1. [ ] Walk dog"));
    }

    #[test]
    fn test_trash_listing_has_no_numbers() {
        let (_temp, mut ctx) = temp_context();
        let kept = insert(&mut ctx, EntryKind::Note, "Keep me", 2);
        let binned = insert(&mut ctx, EntryKind::Note, "Bin me", 1);
        ctx.store.trash(binned.id).unwrap();

        let all = list(&ctx, ListFilter::All);
        assert!(all.contains("1. Keep me"));
        assert!(!all.contains("Bin me"));

        let trash = list(&ctx, ListFilter::Trash);
        assert!(trash.contains("- Bin me"));
        assert!(!trash.contains(&kept.title));
    }

    #[test]
    fn test_empty_listing() {
        let (_temp, ctx) = temp_context();
        assert!(list(&ctx, ListFilter::Pending).contains("Nothing to list (pending)."));
    }
}
