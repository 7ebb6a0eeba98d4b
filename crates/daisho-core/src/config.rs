// crates/daisho-core/src/config.rs - Configuration bootstrap and loading
//
// Daisho keeps everything it owns in one home directory:
//
//   <home>/
//   ├── daisho.conf    configuration (TOML)
//   ├── history.txt    REPL line history
//   ├── daisho.log     log file
//   └── daisho.json    document database
//
// HOME DIRECTORY RESOLUTION (highest to lowest priority):
// 1. --home command-line flag
// 2. DAISHO_HOME environment variable
// 3. Platform config directory + "daisho" (~/.config/daisho on Linux)
//
// The first run creates the home directory, writes a commented default
// config and an empty history file. Later runs load and validate the config.
// DAISHO_EDITOR overrides the configured editor command.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "daisho.conf";
pub const HISTORY_FILE: &str = "history.txt";
pub const LOG_FILE: &str = "daisho.log";
pub const DATABASE_FILE: &str = "daisho.json";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that can occur during configuration bootstrap and loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine a home directory for Daisho; set DAISHO_HOME or pass --home")]
    NoHome,

    #[error("Invalid TOML syntax in {file}: {error}")]
    ParseError { file: String, error: String },

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("I/O error on {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Whether bootstrap had to create the home directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    Created,
    Existing,
}

/// Complete, resolved configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaishoConfig {
    pub global: GlobalConfig,
    pub database: DatabaseConfig,
    pub editor: EditorConfig,
    pub log: LogConfig,
}

/// File locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub daisho_home: PathBuf,
    pub config: PathBuf,
    pub history: PathBuf,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the JSON document database
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Editor command, may include arguments ("code --wait")
    ///
    /// When unset the EDITOR environment variable is used.
    pub command: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

impl DaishoConfig {
    /// Built-in defaults for a given home directory
    pub fn for_home(home: &Path) -> Self {
        Self {
            global: GlobalConfig {
                daisho_home: home.to_path_buf(),
                config: home.join(CONFIG_FILE),
                history: home.join(HISTORY_FILE),
                log_file: home.join(LOG_FILE),
            },
            database: DatabaseConfig {
                path: home.join(DATABASE_FILE),
            },
            editor: EditorConfig::default(),
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

/// Shape of the config file on disk: every key optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    global: RawGlobal,
    database: RawDatabase,
    editor: EditorConfig,
    log: RawLog,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGlobal {
    history: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDatabase {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLog {
    level: Option<String>,
}

/// Configuration bootstrap and loading
pub struct ConfigManager;

impl ConfigManager {
    /// Pick the home directory: explicit flag, DAISHO_HOME, platform default
    pub fn resolve_home(explicit: Option<PathBuf>) -> ConfigResult<PathBuf> {
        explicit
            .or_else(|| env::var_os("DAISHO_HOME").map(PathBuf::from))
            .or_else(|| {
                directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("daisho"))
            })
            .ok_or(ConfigError::NoHome)
    }

    /// Create the home directory on first run, then load the configuration
    pub fn bootstrap(home: &Path) -> ConfigResult<(DaishoConfig, Bootstrap)> {
        let config_path = home.join(CONFIG_FILE);

        let outcome = if config_path.exists() {
            Bootstrap::Existing
        } else {
            let defaults = DaishoConfig::for_home(home);

            fs::create_dir_all(home).map_err(|source| io_error(home, source))?;
            fs::write(&config_path, Self::generate_default_config(&defaults))
                .map_err(|source| io_error(&config_path, source))?;
            touch(&defaults.global.history)?;

            Bootstrap::Created
        };

        let mut config = Self::load(home)?;
        Self::apply_editor_override(&mut config, env::var("DAISHO_EDITOR").ok());
        Self::validate(&config)?;

        Ok((config, outcome))
    }

    /// Load `<home>/daisho.conf` on top of the built-in defaults
    ///
    /// Relative paths in the file are resolved against the home directory.
    pub fn load(home: &Path) -> ConfigResult<DaishoConfig> {
        let mut config = DaishoConfig::for_home(home);
        let config_path = home.join(CONFIG_FILE);

        let content =
            fs::read_to_string(&config_path).map_err(|source| io_error(&config_path, source))?;
        let raw: RawConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: config_path.display().to_string(),
            error: e.to_string(),
        })?;

        if let Some(history) = raw.global.history {
            config.global.history = home.join(history);
        }
        if let Some(log_file) = raw.global.log_file {
            config.global.log_file = home.join(log_file);
        }
        if let Some(path) = raw.database.path {
            config.database.path = home.join(path);
        }
        if raw.editor.command.is_some() {
            config.editor = raw.editor;
        }
        if let Some(level) = raw.log.level {
            config.log.level = level.to_lowercase();
        }

        Ok(config)
    }

    /// DAISHO_EDITOR wins over the config file
    pub fn apply_editor_override(config: &mut DaishoConfig, editor: Option<String>) {
        if let Some(editor) = editor.filter(|e| !e.trim().is_empty()) {
            config.editor.command = Some(editor);
        }
    }

    /// Reject settings the shell cannot run with
    pub fn validate(config: &DaishoConfig) -> ConfigResult<()> {
        if !LOG_LEVELS.contains(&config.log.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Must be one of: {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if config.database.path.as_os_str().is_empty()
            || config.database.path == config.global.daisho_home
        {
            return Err(ConfigError::ValidationError(
                "database.path must point to a file, not the Daisho home directory".to_string(),
            ));
        }

        if let Some(command) = &config.editor.command {
            if command.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "editor.command cannot be blank; remove the key to use $EDITOR".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Default configuration file, with comments
    pub fn generate_default_config(config: &DaishoConfig) -> String {
        let quoted = |path: &Path| toml::Value::String(path.display().to_string()).to_string();

        format!(
            r#"# Daisho Configuration File
#
# Lines starting with # are comments and are ignored.
# Relative paths are resolved against the Daisho home directory.

[global]
daisho_home = {home}
config = {config}
history = {history}
log_file = {log_file}

[database]
# JSON document database holding all notes and tasks
path = {database}

[editor]
# Editor used by `edit` (overridden by DAISHO_EDITOR, falls back to EDITOR)
# command = "vim"

[log]
# One of: trace, debug, info, warn, error
level = "info"
"#,
            home = quoted(&config.global.daisho_home),
            config = quoted(&config.global.config),
            history = quoted(&config.global.history),
            log_file = quoted(&config.global.log_file),
            database = quoted(&config.database.path),
        )
    }
}

fn io_error(path: &Path, source: std::io::Error) -> ConfigError {
    ConfigError::IoError {
        path: path.display().to_string(),
        source,
    }
}

/// Create an empty file unless it already exists
fn touch(path: &Path) -> ConfigResult<()> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| io_error(path, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_bootstrap_creates_home() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("daisho");

        let (config, outcome) = ConfigManager::bootstrap(&home).unwrap();
        assert_eq!(outcome, Bootstrap::Created);
        assert!(home.join(CONFIG_FILE).exists());
        assert!(home.join(HISTORY_FILE).exists());
        assert_eq!(config.database.path, home.join(DATABASE_FILE));
        assert_eq!(config.log.level, "info");

        let (again, outcome) = ConfigManager::bootstrap(&home).unwrap();
        assert_eq!(outcome, Bootstrap::Existing);
        assert_eq!(again.global, config.global);
        assert_eq!(again.database, config.database);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = DaishoConfig::for_home(Path::new("/tmp/daisho"));
        assert!(ConfigManager::validate(&config).is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config = DaishoConfig::for_home(Path::new("/tmp/daisho"));
        let text = ConfigManager::generate_default_config(&config);
        let raw: RawConfig = toml::from_str(&text).unwrap();
        assert_eq!(raw.database.path, Some(PathBuf::from("/tmp/daisho/daisho.json")));
        assert_eq!(raw.log.level.as_deref(), Some("info"));
        assert!(raw.editor.command.is_none());
    }

    #[test]
    fn test_load_applies_file_values() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "[database]\npath = \"data/notes.json\"\n\n[editor]\ncommand = \"hx\"\n\n[log]\nlevel = \"DEBUG\"\n",
        )
        .unwrap();

        let config = ConfigManager::load(temp.path()).unwrap();
        assert_eq!(config.database.path, temp.path().join("data/notes.json"));
        assert_eq!(config.editor.command.as_deref(), Some("hx"));
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.global.history, temp.path().join(HISTORY_FILE));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[log\nlevel = ").unwrap();
        assert!(matches!(
            ConfigManager::load(temp.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level_validation() {
        let mut config = DaishoConfig::for_home(Path::new("/tmp/daisho"));
        config.log.level = "loud".to_string();
        assert!(ConfigManager::validate(&config).is_err());
    }

    #[test]
    fn test_editor_override() {
        let mut config = DaishoConfig::for_home(Path::new("/tmp/daisho"));
        config.editor.command = Some("vim".to_string());

        ConfigManager::apply_editor_override(&mut config, None);
        assert_eq!(config.editor.command.as_deref(), Some("vim"));

        ConfigManager::apply_editor_override(&mut config, Some("  ".to_string()));
        assert_eq!(config.editor.command.as_deref(), Some("vim"));

        ConfigManager::apply_editor_override(&mut config, Some("nano".to_string()));
        assert_eq!(config.editor.command.as_deref(), Some("nano"));
    }

    #[test]
    fn test_explicit_home_wins() {
        let home = ConfigManager::resolve_home(Some(PathBuf::from("/srv/daisho"))).unwrap();
        assert_eq!(home, PathBuf::from("/srv/daisho"));
    }
}
