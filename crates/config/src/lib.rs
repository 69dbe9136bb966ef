//! Layered configuration: built-in defaults, an optional TOML file, and
//! `LECTERN_`-prefixed environment variables, later layers winning.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PREFIX: &str = "LECTERN_";
const CONFIG_FILENAME: &str = "lectern.toml";
const DATABASE_FILENAME: &str = "lectern.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub import: ImportConfig,
    pub suggestions: SuggestionsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path. Empty means "derive a per-user default at load
    /// time" so a serialized default config stays machine-independent.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Verse rows per insert transaction during corpus replacement.
    pub batch_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    /// Maximum autocomplete entries returned per phase.
    pub limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: PathBuf::new() },
            import: ImportConfig::default(),
            suggestions: SuggestionsConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: PathBuf::new() }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { batch_size: 500 }
    }
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl Config {
    /// Load configuration, merging (lowest to highest precedence) built-in
    /// defaults, the TOML file at `file` (or the per-user config location
    /// when `None`), and `LECTERN_*` environment variables with `__` as the
    /// section separator, e.g. `LECTERN_IMPORT__BATCH_SIZE=250`.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None => {
                if let Some(dirs) = project_dirs() {
                    figment = figment.merge(Toml::file(dirs.config_dir().join(CONFIG_FILENAME)));
                }
            }
        }
        let mut config: Config =
            figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract().or_raise(|| ErrorKind::Figment)?;
        if config.database.path.as_os_str().is_empty() {
            config.database.path = default_database_path()?;
        }
        debug!(database = %config.database.path.display(), "configuration loaded");
        Ok(config)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "lectern", "lectern")
}

fn default_database_path() -> Result<PathBuf> {
    let dirs = project_dirs().ok_or_raise(|| ErrorKind::NoHomeDirectory)?;
    Ok(dirs.data_dir().join(DATABASE_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.import.batch_size, 500);
        assert_eq!(config.suggestions.limit, 5);
        assert!(config.database.path.as_os_str().is_empty());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[database]\npath = \"/tmp/corpus.db\"\n\n[import]\nbatch_size = 250"
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/tmp/corpus.db"));
        assert_eq!(config.import.batch_size, 250);
        // Untouched sections keep their defaults.
        assert_eq!(config.suggestions.limit, 5);
    }

    #[test]
    fn test_empty_database_path_gets_per_user_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.database.path.ends_with(DATABASE_FILENAME));
    }
}
