use chrono::{Local, NaiveDate};
use daisho_core::{DaishoConfig, DocumentStore};

/// Application context passed to command handlers
///
/// Owns the resolved configuration and the open database for the lifetime
/// of the shell.
pub struct Context {
    pub store: DocumentStore,
    config: DaishoConfig,
}

impl Context {
    pub fn new(config: DaishoConfig, store: DocumentStore) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &DaishoConfig {
        &self.config
    }

    /// Local calendar date used by date filters
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    /// A context over a fresh database in a temporary home
    pub fn temp_context() -> (TempDir, Context) {
        let temp = TempDir::new().unwrap();
        let context = context_in(temp.path());
        (temp, context)
    }

    pub fn context_in(home: &Path) -> Context {
        let config = DaishoConfig::for_home(home);
        let store = DocumentStore::open(&config.database.path).unwrap();
        Context::new(config, store)
    }
}
