// crates/daisho-core/src/filter.rs - `list` filters

use chrono::{Days, NaiveDate};
use std::fmt;

use crate::entry::{format_date, Entry, EntryKind, Priority};

/// Which entries `list` shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    /// Everything that is not in the trash
    All,
    Today,
    Tomorrow,
    Date(NaiveDate),
    /// Normalized tag, without `#`
    Tag(String),
    Priority(Priority),
    /// Trashed entries only
    Trash,
    /// Tasks not marked done
    Pending,
}

impl ListFilter {
    /// Whether `entry` passes this filter, relative to `today`
    pub fn matches(&self, entry: &Entry, today: NaiveDate) -> bool {
        match self {
            Self::Trash => entry.trashed,
            _ if entry.trashed => false,
            Self::All => true,
            Self::Today => entry.effective_date() == today,
            Self::Tomorrow => today
                .checked_add_days(Days::new(1))
                .is_some_and(|tomorrow| entry.effective_date() == tomorrow),
            Self::Date(date) => entry.effective_date() == *date,
            Self::Tag(tag) => entry.has_tag(tag),
            Self::Priority(priority) => entry.priority == Some(*priority),
            Self::Pending => entry.kind == EntryKind::Task && !entry.done,
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Today => write!(f, "today"),
            Self::Tomorrow => write!(f, "tomorrow"),
            Self::Date(date) => write!(f, "date {}", format_date(*date)),
            Self::Tag(tag) => write!(f, "tags #{}", tag),
            Self::Priority(priority) => write!(f, "prio {}", priority),
            Self::Trash => write!(f, "trash"),
            Self::Pending => write!(f, "pending"),
        }
    }
}
