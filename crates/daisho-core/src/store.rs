// crates/daisho-core/src/store.rs - Local document database
//
// Daisho keeps every note and task in one JSON document file:
//
//   { "version": 1, "entries": [ { ...entry... }, ... ] }
//
// The whole collection lives in memory while the shell runs. Each mutation
// rewrites the file through a sibling temp file and a rename, so a crash
// leaves either the old or the new database on disk, never half of one.
//
// NUMBERING:
// Users address entries as `<kind> <number>`. The number is the 1-based
// position among the non-trashed entries of that kind, oldest first. It is
// recomputed on every call, so removing note 2 turns note 3 into note 2.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::command::Selector;
use crate::entry::{Entry, EntryKind};
use crate::filter::ListFilter;

/// On-disk format version this build reads and writes
pub const STORE_VERSION: u32 = 1;

/// Errors that can occur while opening or modifying the database
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on database {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database {path} is not a valid Daisho database: {error}")]
    Corrupt { path: String, error: String },

    #[error(
        "Database {path} has version {found}, this build supports version {supported}",
        supported = STORE_VERSION
    )]
    Version { path: String, found: u32 },

    #[error("There is no {0} in the list")]
    NoSuchEntry(Selector),

    #[error("No entry with id {0}")]
    UnknownId(Uuid),

    #[error("Failed to encode database: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Serialize, Deserialize)]
struct DatabaseFile {
    version: u32,
    #[serde(default)]
    entries: Vec<Entry>,
}

/// JSON-file backed collection of entries
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl DocumentStore {
    /// Open the database at `path`, creating an empty one if it is missing
    ///
    /// This doubles as the startup connection check: a database that cannot
    /// be read or parsed is reported here, before the shell starts.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if !path.exists() {
            info!(path = %path.display(), "creating empty database");
            let store = Self {
                path,
                entries: Vec::new(),
            };
            store.write(&store.entries)?;
            return Ok(store);
        }

        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let file: DatabaseFile =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;

        if file.version != STORE_VERSION {
            return Err(StoreError::Version {
                path: path.display().to_string(),
                found: file.version,
            });
        }

        info!(
            path = %path.display(),
            entries = file.entries.len(),
            "opened database"
        );

        Ok(Self {
            path,
            entries: file.entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every entry, trashed ones included, in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn insert(&mut self, entry: Entry) -> StoreResult<Uuid> {
        let id = entry.id;
        debug!(%id, kind = %entry.kind, "inserting entry");
        let mut entries = self.entries.clone();
        entries.push(entry);
        self.commit(entries)?;
        Ok(id)
    }

    /// Replace the stored entry that has the same id
    pub fn update(&mut self, entry: Entry) -> StoreResult<()> {
        let index = self.index_of(entry.id)?;
        debug!(id = %entry.id, "updating entry");
        let mut entries = self.entries.clone();
        entries[index] = entry;
        self.commit(entries)
    }

    /// Move an entry to the trash
    pub fn trash(&mut self, id: Uuid) -> StoreResult<()> {
        let index = self.index_of(id)?;
        let mut entries = self.entries.clone();
        entries[index].trashed = true;
        entries[index].touch();
        debug!(%id, "trashed entry");
        self.commit(entries)
    }

    /// Remove an entry permanently, returning it
    pub fn delete(&mut self, id: Uuid) -> StoreResult<Entry> {
        let index = self.index_of(id)?;
        let mut entries = self.entries.clone();
        let entry = entries.remove(index);
        debug!(%id, "deleted entry");
        self.commit(entries)?;
        Ok(entry)
    }

    /// Non-trashed entries of `kind`, oldest first, numbered from 1
    pub fn numbered(&self, kind: EntryKind) -> Vec<(usize, &Entry)> {
        let mut active: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| e.kind == kind && !e.trashed)
            .collect();
        active.sort_by_key(|e| e.created);
        active
            .into_iter()
            .enumerate()
            .map(|(index, entry)| (index + 1, entry))
            .collect()
    }

    /// Position of an entry in its kind's numbering, if it has one
    pub fn number_of(&self, id: Uuid) -> Option<usize> {
        let entry = self.get(id)?;
        self.numbered(entry.kind)
            .into_iter()
            .find(|(_, e)| e.id == id)
            .map(|(number, _)| number)
    }

    /// Look up the entry a selector points at
    pub fn resolve(&self, selector: Selector) -> StoreResult<&Entry> {
        self.numbered(selector.kind)
            .into_iter()
            .find(|(number, _)| *number == selector.number)
            .map(|(_, entry)| entry)
            .ok_or(StoreError::NoSuchEntry(selector))
    }

    /// Entries passing `filter`, notes before tasks, oldest first
    pub fn find(&self, filter: &ListFilter, today: NaiveDate) -> Vec<&Entry> {
        let mut found: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| filter.matches(e, today))
            .collect();
        found.sort_by_key(|e| (e.kind, e.created));
        found
    }

    /// Non-trashed entries containing `keyword`, notes before tasks
    pub fn search(&self, keyword: &str) -> Vec<&Entry> {
        let mut found: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| !e.trashed && e.contains_keyword(keyword))
            .collect();
        found.sort_by_key(|e| (e.kind, e.created));
        found
    }

    fn index_of(&self, id: Uuid) -> StoreResult<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownId(id))
    }

    /// Persist `entries`, then make them the in-memory collection
    ///
    /// A failed write leaves the store exactly as it was.
    fn commit(&mut self, entries: Vec<Entry>) -> StoreResult<()> {
        self.write(&entries)?;
        self.entries = entries;
        Ok(())
    }

    /// Write a collection to disk atomically
    fn write(&self, entries: &[Entry]) -> StoreResult<()> {
        let io_error = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_error)?;
            }
        }

        let file = DatabaseFile {
            version: STORE_VERSION,
            entries: entries.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_error)?;
        fs::rename(&tmp_path, &self.path).map_err(io_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn entry(kind: EntryKind, title: &str, age_minutes: i64) -> Entry {
        let mut entry = Entry::new(kind, title).unwrap();
        entry.created = Utc::now() - Duration::minutes(age_minutes);
        entry
    }

    fn open_store() -> (TempDir, DocumentStore) {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::open(temp.path().join("daisho.json")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_open_creates_empty_database() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("daisho.json");

        let store = DocumentStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.entries().is_empty());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"version\": 1"));
    }

    #[test]
    fn test_entries_persist_across_opens() {
        let (temp, mut store) = open_store();
        let id = store.insert(entry(EntryKind::Task, "Water plants", 0)).unwrap();

        let reopened = DocumentStore::open(temp.path().join("daisho.json")).unwrap();
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.get(id).unwrap().title, "Water plants");
    }

    #[test]
    fn test_open_rejects_corrupt_and_future_databases() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("daisho.json");

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            DocumentStore::open(&path),
            Err(StoreError::Corrupt { .. })
        ));

        fs::write(&path, r#"{"version": 7, "entries": []}"#).unwrap();
        assert!(matches!(
            DocumentStore::open(&path),
            Err(StoreError::Version { found: 7, .. })
        ));
    }

    #[test]
    fn test_numbering_is_per_kind_and_oldest_first() {
        let (_temp, mut store) = open_store();
        store.insert(entry(EntryKind::Note, "second note", 5)).unwrap();
        store.insert(entry(EntryKind::Task, "only task", 3)).unwrap();
        store.insert(entry(EntryKind::Note, "first note", 10)).unwrap();

        let notes: Vec<_> = store
            .numbered(EntryKind::Note)
            .into_iter()
            .map(|(n, e)| (n, e.title.clone()))
            .collect();
        assert_eq!(
            notes,
            vec![(1, "first note".to_string()), (2, "second note".to_string())]
        );

        let task = store
            .resolve(Selector { kind: EntryKind::Task, number: 1 })
            .unwrap();
        assert_eq!(task.title, "only task");
        assert!(matches!(
            store.resolve(Selector { kind: EntryKind::Task, number: 2 }),
            Err(StoreError::NoSuchEntry(_))
        ));
    }

    #[test]
    fn test_trash_renumbers_and_delete_removes() {
        let (_temp, mut store) = open_store();
        let a = store.insert(entry(EntryKind::Note, "a", 3)).unwrap();
        let b = store.insert(entry(EntryKind::Note, "b", 2)).unwrap();
        let c = store.insert(entry(EntryKind::Note, "c", 1)).unwrap();

        store.trash(b).unwrap();
        assert_eq!(store.number_of(c), Some(2));
        assert_eq!(store.number_of(b), None);
        assert!(store.get(b).unwrap().trashed);

        let removed = store.delete(a).unwrap();
        assert_eq!(removed.title, "a");
        assert!(store.get(a).is_none());
        assert_eq!(store.number_of(c), Some(1));

        assert!(matches!(store.delete(a), Err(StoreError::UnknownId(_))));
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let (temp, mut store) = open_store();
        let kept = store.insert(entry(EntryKind::Note, "kept", 1)).unwrap();

        // A directory where the temp file should go makes every write fail.
        fs::create_dir(temp.path().join("daisho.json.tmp")).unwrap();

        assert!(matches!(
            store.insert(entry(EntryKind::Note, "ghost", 0)),
            Err(StoreError::Io { .. })
        ));
        let mut renamed = store.get(kept).unwrap().clone();
        renamed.title = "renamed".to_string();
        assert!(store.update(renamed).is_err());
        assert!(store.trash(kept).is_err());
        assert!(store.delete(kept).is_err());

        assert_eq!(store.entries().len(), 1);
        let stored = store.get(kept).unwrap();
        assert_eq!(stored.title, "kept");
        assert!(!stored.trashed);
        let today = chrono::Local::now().date_naive();
        assert_eq!(store.find(&ListFilter::All, today).len(), 1);

        fs::remove_dir(temp.path().join("daisho.json.tmp")).unwrap();
        let reopened = DocumentStore::open(temp.path().join("daisho.json")).unwrap();
        assert_eq!(reopened.entries(), store.entries());
    }

    #[test]
    fn test_update_replaces_entry() {
        let (temp, mut store) = open_store();
        let id = store.insert(entry(EntryKind::Task, "draft", 0)).unwrap();

        let mut changed = store.get(id).unwrap().clone();
        changed.title = "final".to_string();
        changed.done = true;
        store.update(changed).unwrap();

        let reopened = DocumentStore::open(temp.path().join("daisho.json")).unwrap();
        let stored = reopened.get(id).unwrap();
        assert_eq!(stored.title, "final");
        assert!(stored.done);

        let stranger = entry(EntryKind::Task, "not stored", 0);
        assert!(matches!(
            store.update(stranger),
            Err(StoreError::UnknownId(_))
        ));
    }

    #[test]
    fn test_find_and_search() {
        let (_temp, mut store) = open_store();
        let mut milk = entry(EntryKind::Task, "Buy milk", 2);
        milk.tags = vec!["errands".to_string()];
        store.insert(milk).unwrap();
        store.insert(entry(EntryKind::Note, "Milk tea recipe", 1)).unwrap();
        let gone = store.insert(entry(EntryKind::Note, "Old milk note", 3)).unwrap();
        store.trash(gone).unwrap();

        let today = chrono::Local::now().date_naive();
        let all = store.find(&ListFilter::All, today);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, EntryKind::Note);

        let trash = store.find(&ListFilter::Trash, today);
        assert_eq!(trash.len(), 1);
        assert_eq!(trash[0].title, "Old milk note");

        let hits: Vec<_> = store.search("MILK").iter().map(|e| e.title.clone()).collect();
        assert_eq!(hits, vec!["Milk tea recipe", "Buy milk"]);
        assert_eq!(store.search("errands").len(), 1);
        assert_eq!(store.search("#errands").len(), 1);
        assert!(store.search("coffee").is_empty());
    }
}
