//! Settings file for the `budget` command.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "budget.db"
//!
//! [pay]
//! frequency = "biweekly"
//!
//! [logging]
//! level = "info"
//! file = "budget.log"
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use budget_core::PayFrequency;
use budget_core::db::DbConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "BUDGET_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "budget.toml";

const DEFAULT_DATABASE: &str = "budget.db";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub pay: PayConfig,
    pub logging: LoggingConfig,
}

/// `[database]`: unlike [`DbConfig::default`], a missing connection string
/// means a `budget.db` file rather than an in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DbConfig::default().backend,
            connection_string: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl From<&DatabaseConfig> for DbConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            backend: config.backend.clone(),
            connection_string: config.connection_string.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayConfig {
    pub frequency: PayFrequency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive.
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub connection_string: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the first config file found, or defaults when there is none.
    ///
    /// Lookup order: `explicit`, then `$BUDGET_CONFIG`, then `./budget.toml`.
    /// The returned path is the file actually read.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        match locate(explicit, from_env, Path::new(DEFAULT_CONFIG_FILE)) {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.backend {
            self.database.backend = backend;
        }
        if let Some(connection_string) = overrides.connection_string {
            self.database.connection_string = connection_string;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(file) = overrides.log_file {
            self.logging.file = Some(file);
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::from(&self.database)
    }
}

fn locate(explicit: Option<&Path>, from_env: Option<PathBuf>, fallback: &Path) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| fallback.is_file().then(|| fallback.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.database.connection_string, "budget.db");
        assert_eq!(config.pay.frequency, PayFrequency::Biweekly);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn full_file_is_read() {
        let config = AppConfig::from_toml_str(
            r#"
            [database]
            backend = "sqlite"
            connection_string = "/var/lib/budget/goals.db"

            [pay]
            frequency = "weekly"

            [logging]
            level = "debug"
            file = "budget.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.database.connection_string, "/var/lib/budget/goals.db");
        assert_eq!(config.pay.frequency, PayFrequency::Weekly);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("budget.log")));
    }

    #[test]
    fn partial_database_section_keeps_file_default() {
        let config = AppConfig::from_toml_str("[database]\nbackend = \"sqlite\"\n").unwrap();

        assert_eq!(config.database.connection_string, "budget.db");
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert!(AppConfig::from_toml_str("[pay]\nfrequency = \"daily\"\n").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = AppConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn load_reports_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database").unwrap();

        let result = AppConfig::load(file.path());

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();

        config.apply(ConfigOverrides {
            connection_string: Some(":memory:".to_string()),
            log_level: Some("warn".to_string()),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(
            config.db_config(),
            DbConfig {
                backend: "sqlite".to_string(),
                connection_string: ":memory:".to_string(),
            }
        );
        assert_eq!(config.logging.level, "warn");
    }

    // =========================================================================
    // locate
    // =========================================================================

    #[test]
    fn explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("budget.toml");
        std::fs::write(&fallback, "").unwrap();

        let found = locate(
            Some(Path::new("chosen.toml")),
            Some(PathBuf::from("env.toml")),
            &fallback,
        );

        assert_eq!(found, Some(PathBuf::from("chosen.toml")));
    }

    #[test]
    fn env_path_beats_working_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("budget.toml");
        std::fs::write(&fallback, "").unwrap();

        let found = locate(None, Some(PathBuf::from("env.toml")), &fallback);

        assert_eq!(found, Some(PathBuf::from("env.toml")));
    }

    #[test]
    fn fallback_used_only_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join("budget.toml");

        assert_eq!(locate(None, None, &fallback), None);

        std::fs::write(&fallback, "").unwrap();
        assert_eq!(locate(None, None, &fallback), Some(fallback.clone()));
    }
}
