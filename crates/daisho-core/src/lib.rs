// crates/daisho-core/src/lib.rs - Daisho core library
//
// Everything the interactive shell needs that does not touch the terminal:
//
// - config:  home directory layout, config file bootstrap and loading
// - entry:   the note/task document model and its edit format
// - filter:  `list` filters (today, tags, prio, trash, ...)
// - command: REPL line parsing and argument validation
// - store:   the JSON document database

pub mod command;
pub mod config;
pub mod entry;
pub mod filter;
pub mod store;

pub use command::{Command, Selector, UsageError};
pub use config::{Bootstrap, ConfigError, ConfigManager, DaishoConfig};
pub use entry::{Entry, EntryError, EntryKind, Priority};
pub use filter::ListFilter;
pub use store::{DocumentStore, StoreError};
