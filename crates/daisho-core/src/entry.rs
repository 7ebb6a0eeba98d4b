// crates/daisho-core/src/entry.rs - Note and task documents
//
// An entry is the single document type stored in the database. Notes and
// tasks share the same shape; `done` only means something for tasks.
//
// Besides the model itself this module owns the "edit document", the plain
// text form an entry takes while it is open in the user's editor:
//
//   title: Buy milk
//   tags: home, errands
//   priority: #high
//   due: 21-10-2026
//   done: no
//   ---
//   Body text, any number of lines.

use chrono::{DateTime, Local, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use uuid::Uuid;

/// Date format used for every date a user types or reads
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Line separating the header of an edit document from the body
const DOCUMENT_SEPARATOR: &str = "---";

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_-]+$").expect("tag pattern is valid"));

/// Errors that can occur while building or editing entries
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("Unknown entry kind '{0}', expected `note` or `task`")]
    InvalidKind(String),

    #[error("Unknown priority '{0}', expected #high, #med or #low")]
    InvalidPriority(String),

    #[error("Invalid date '{0}', expected DD-MM-YYYY")]
    InvalidDate(String),

    #[error("Invalid tag '{0}': tags may contain letters, digits, '-' and '_'")]
    InvalidTag(String),

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Invalid value for done: '{0}', expected yes or no")]
    InvalidFlag(String),

    #[error("Unknown field '{0}' in edited document")]
    UnknownField(String),

    #[error("Malformed header line {line}: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Missing '---' line between header and body")]
    MissingSeparator,
}

/// Result type for entry operations
pub type EntryResult<T> = Result<T, EntryError>;

/// What an entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Note,
    Task,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Note, EntryKind::Task];

    /// Section heading used when listing
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Note => "Notes",
            Self::Task => "Tasks",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Task => write!(f, "task"),
        }
    }
}

impl FromStr for EntryKind {
    type Err = EntryError;

    fn from_str(s: &str) -> EntryResult<Self> {
        match s.to_lowercase().as_str() {
            "note" => Ok(Self::Note),
            "task" => Ok(Self::Task),
            _ => Err(EntryError::InvalidKind(s.to_string())),
        }
    }
}

/// Entry priority, written `#high`, `#med` or `#low`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Med,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "#high"),
            Self::Med => write!(f, "#med"),
            Self::Low => write!(f, "#low"),
        }
    }
}

impl FromStr for Priority {
    type Err = EntryError;

    /// The leading `#` is optional so both `#high` and `high` parse
    fn from_str(s: &str) -> EntryResult<Self> {
        let value = s.trim();
        match value.strip_prefix('#').unwrap_or(value).to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "med" | "medium" => Ok(Self::Med),
            "low" => Ok(Self::Low),
            _ => Err(EntryError::InvalidPriority(s.to_string())),
        }
    }
}

/// Parse a `DD-MM-YYYY` date
pub fn parse_date(input: &str) -> EntryResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| EntryError::InvalidDate(input.trim().to_string()))
}

/// Format a date as `DD-MM-YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Normalize a single tag: strip `#`, lowercase, validate characters
pub fn normalize_tag(raw: &str) -> EntryResult<String> {
    let trimmed = raw.trim();
    let tag = trimmed.strip_prefix('#').unwrap_or(trimmed).to_lowercase();
    if !TAG_PATTERN.is_match(&tag) {
        return Err(EntryError::InvalidTag(raw.to_string()));
    }
    Ok(tag)
}

/// Parse a list of tags separated by whitespace and/or commas
///
/// Duplicates are dropped, first occurrence wins.
pub fn parse_tags(input: &str) -> EntryResult<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for raw in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let tag = normalize_tag(raw)?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    Ok(tags)
}

/// A note or task document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub trashed: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Entry {
    /// Create a new entry with a fresh id and the current timestamp
    pub fn new(kind: EntryKind, title: &str) -> EntryResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EntryError::EmptyTitle);
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            body: String::new(),
            tags: Vec::new(),
            priority: None,
            due: None,
            done: false,
            trashed: false,
            created: now,
            updated: now,
        })
    }

    pub fn set_body(&mut self, body: &str) {
        self.body = body.trim_end().to_string();
    }

    /// The date `today`/`tomorrow`/`date` filters look at
    ///
    /// Due date when there is one, otherwise the local creation date.
    pub fn effective_date(&self) -> NaiveDate {
        self.due
            .unwrap_or_else(|| self.created.with_timezone(&Local).date_naive())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim_start_matches('#').to_lowercase();
        self.tags.iter().any(|t| *t == wanted)
    }

    /// Case-insensitive substring match over title, body and tags
    ///
    /// Tags are stored without `#`, so a leading `#` is ignored when
    /// matching them.
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        if needle.is_empty() {
            return false;
        }
        let tag_needle = needle.trim_start_matches('#');
        self.title.to_lowercase().contains(&needle)
            || self.body.to_lowercase().contains(&needle)
            || (!tag_needle.is_empty() && self.tags.iter().any(|t| t.contains(tag_needle)))
    }

    pub fn touch(&mut self) {
        self.updated = Utc::now();
    }

    /// Render the entry as an edit document
    pub fn render_document(&self) -> String {
        let mut doc = String::new();
        doc.push_str(&format!("title: {}\n", self.title));
        doc.push_str(&format!("tags: {}\n", self.tags.join(", ")));
        doc.push_str(&format!(
            "priority: {}\n",
            self.priority.map(|p| p.to_string()).unwrap_or_default()
        ));
        doc.push_str(&format!(
            "due: {}\n",
            self.due.map(format_date).unwrap_or_default()
        ));
        if self.kind == EntryKind::Task {
            doc.push_str(&format!("done: {}\n", if self.done { "yes" } else { "no" }));
        }
        doc.push_str(DOCUMENT_SEPARATOR);
        doc.push('\n');
        if !self.body.is_empty() {
            doc.push_str(&self.body);
            doc.push('\n');
        }
        doc
    }

    /// Apply an edited document to this entry
    ///
    /// The document is validated completely before anything is changed.
    /// Returns whether the entry changed.
    pub fn apply_document(&mut self, document: &str) -> EntryResult<bool> {
        let mut title = None;
        let mut tags = Vec::new();
        let mut priority = None;
        let mut due = None;
        let mut done = false;

        let mut lines = document.lines().enumerate();
        let mut separated = false;

        for (index, line) in lines.by_ref() {
            if line.trim() == DOCUMENT_SEPARATOR {
                separated = true;
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                return Err(EntryError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            };
            let value = value.trim();

            match key.trim().to_lowercase().as_str() {
                "title" => title = Some(value.to_string()),
                "tags" => tags = parse_tags(value)?,
                "priority" if value.is_empty() => priority = None,
                "priority" => priority = Some(value.parse::<Priority>()?),
                "due" if value.is_empty() => due = None,
                "due" => due = Some(parse_date(value)?),
                "done" if self.kind == EntryKind::Task => done = parse_flag(value)?,
                other => return Err(EntryError::UnknownField(other.to_string())),
            }
        }

        if !separated {
            return Err(EntryError::MissingSeparator);
        }

        let title = title.unwrap_or_default();
        if title.is_empty() {
            return Err(EntryError::EmptyTitle);
        }

        let body = lines
            .map(|(_, line)| line)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string();

        let changed = title != self.title
            || body != self.body
            || tags != self.tags
            || priority != self.priority
            || due != self.due
            || done != self.done;

        if changed {
            self.title = title;
            self.body = body;
            self.tags = tags;
            self.priority = priority;
            self.due = due;
            self.done = done;
            self.touch();
        }

        Ok(changed)
    }
}

fn parse_flag(value: &str) -> EntryResult<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "y" | "true" | "x" => Ok(true),
        "no" | "n" | "false" | "" => Ok(false),
        _ => Err(EntryError::InvalidFlag(value.to_string())),
    }
}
