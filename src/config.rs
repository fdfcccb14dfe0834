//! Config loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "TAGKEEPER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "tagkeeper.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Workspace archive used when a command does not name one.
    pub workspace: Option<PathBuf>,
    /// Project opened by `gui` when none is given.
    pub default_project: Option<i64>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Loads the explicit path if given, else `$TAGKEEPER_CONFIG`, else
    /// `./tagkeeper.toml`. Only an explicit path is required to exist.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.is_file() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }
}
