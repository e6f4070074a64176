//! Pipeline configuration.
//!
//! Values are resolved with the precedence CLI flag > environment variable >
//! config file (`ordernorm.yaml`) > built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::db::DatabaseConfig;
use crate::error::PipelineError;

pub const DEFAULT_CONFIG_FILE: &str = "ordernorm.yaml";
pub const INPUT_ENV: &str = "ORDERNORM_INPUT";
pub const DATABASE_ENV: &str = "ORDERNORM_DATABASE";

/// Settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tab-delimited order file
    pub input: PathBuf,
    /// SQLite database file
    pub database: PathBuf,
    /// Drop all normalized tables before loading
    pub drop_existing: bool,
    /// Delete the database file before connecting
    pub delete_database: bool,
    pub pool: DatabaseConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            database: PathBuf::from("normalized.db"),
            drop_existing: true,
            delete_database: false,
            pool: DatabaseConfig::default(),
        }
    }
}

/// Values given on the command line; `None` falls through to lower layers
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub keep_existing: bool,
    pub delete_database: bool,
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&contents).map_err(|e| {
            PipelineError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, PipelineError> {
        serde_yaml::from_str(contents)
            .map_err(|e| PipelineError::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicitly named config file must exist; the default one is optional.
    pub fn resolve(
        config_file: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, PipelineError> {
        let mut config = match config_file {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Apply environment values read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup(INPUT_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("Using input from {}: {}", INPUT_ENV, input);
            self.input = PathBuf::from(input);
        }
        if let Some(database) = lookup(DATABASE_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("Using database from {}: {}", DATABASE_ENV, database);
            self.database = PathBuf::from(database);
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input) = overrides.input {
            self.input = input;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if overrides.keep_existing {
            self.drop_existing = false;
        }
        if overrides.delete_database {
            self.delete_database = true;
        }
    }
}
