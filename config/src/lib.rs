//! File-based configuration for the fatal-cause policy.
//!
//! ```toml
//! [fatal]
//! include_defaults = true
//! kinds = ["Assertion", "my_panic"]
//! exclude = ["Terminated"]
//! ```
//!
//! The file is looked up at `$RECOURSE_CONFIG`, falling back to
//! `<config dir>/recourse/config.toml`.

use std::path::{Path, PathBuf};
use std::{env, fs};

use recourse_types::{ErrorKind, FatalPolicy, InstallError, fatal};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "RECOURSE_CONFIG";

// bool::default() is false, so only true needs a fn
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct RecourseConfig {
    pub fatal: Option<FatalConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FatalConfig {
    /// Start from [`FatalPolicy::DEFAULT_KINDS`].
    #[serde(default = "default_true")]
    pub include_defaults: bool,
    /// Additional fatal kinds. Unknown names become [`ErrorKind::Other`].
    #[serde(default)]
    pub kinds: Vec<ErrorKind>,
    #[serde(default)]
    pub exclude: Vec<ErrorKind>,
}

impl Default for FatalConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            kinds: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl FatalConfig {
    #[must_use]
    pub fn policy(&self) -> FatalPolicy {
        let base = if self.include_defaults {
            FatalPolicy::default()
        } else {
            FatalPolicy::empty()
        };
        let added = self.kinds.iter().cloned().fold(base, FatalPolicy::with_kind);
        self.exclude.iter().fold(added, FatalPolicy::without_kind)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Install(#[from] InstallError),
}

impl ConfigError {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path.as_path()),
            ConfigError::Install(_) => None,
        }
    }
}

impl RecourseConfig {
    /// Load from [`config_path`]. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match Self::parse(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// The policy described by the `[fatal]` table, or the default policy.
    #[must_use]
    pub fn fatal_policy(&self) -> FatalPolicy {
        self.fatal
            .as_ref()
            .map_or_else(FatalPolicy::default, FatalConfig::policy)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    resolve_path(env::var_os(CONFIG_ENV).map(PathBuf::from), dirs::config_dir())
}

fn resolve_path(explicit: Option<PathBuf>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .filter(|path| !path.as_os_str().is_empty())
        .or_else(|| config_dir.map(|dir| dir.join("recourse").join("config.toml")))
}

/// Load the config file and install its policy as the process classifier.
///
/// Without a config file nothing is installed and the default policy stays
/// in effect. Returns the installed policy, if any.
pub fn install() -> Result<Option<FatalPolicy>, ConfigError> {
    let Some(config) = RecourseConfig::load()? else {
        tracing::debug!("No recourse config found; keeping the default fatal policy");
        return Ok(None);
    };
    let policy = config.fatal_policy();
    fatal::install(policy.clone())?;
    Ok(Some(policy))
}
