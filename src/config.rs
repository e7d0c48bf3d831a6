use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

const FALLBACK_DB_PATH: &str = ".linkdir/links.sqlite";

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub db_path: Option<String>,
    pub seed_defaults: bool,
    pub color: ColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            seed_defaults: true,
            color: ColorMode::Auto,
        }
    }
}

impl Config {
    /// Reads `path`, or the per-user default location when `path` is `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io { path, source: err }),
        };
        Self::from_toml(&raw).map_err(|err| ConfigError::Toml { path, source: err })
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn resolve_db_path(&self, explicit: Option<&str>) -> String {
        if let Some(path) = explicit.map(str::trim).filter(|path| !path.is_empty()) {
            return path.to_string();
        }
        if let Some(path) = self.db_path.as_deref() {
            return path.to_string();
        }
        home_dir()
            .map(|home| {
                home.join(".local/share/linkdir/links.sqlite")
                    .display()
                    .to_string()
            })
            .unwrap_or_else(|| FALLBACK_DB_PATH.to_string())
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config/linkdir/config.toml"))
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Toml { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "cannot read config '{}': {}", path.display(), source)
            }
            ConfigError::Toml { path, source } => {
                write!(f, "invalid config '{}': {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml { source, .. } => Some(source),
        }
    }
}
