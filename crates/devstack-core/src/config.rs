//! devstack home directory configuration.
//!
//! Everything devstack writes lives under a single home directory,
//! `~/.devstack/` unless `DEVSTACK_HOME` or `--home` says otherwise. An
//! optional `config.yaml` in that directory can move the stacks and logs
//! directories elsewhere:
//!
//! ```yaml
//! stacks_dir: /data/devstack/stacks
//! log_dir: /var/log/devstack
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DevstackError, Result};

/// Environment variable overriding the home directory.
pub const HOME_ENV_VAR: &str = "DEVSTACK_HOME";

/// Name of the optional config file inside the home directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolved devstack directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevstackConfig {
    /// Root directory (e.g. `~/.devstack`)
    pub home: PathBuf,

    /// Directory holding one subdirectory per stack
    pub stacks_dir: PathBuf,

    /// Directory for devstack's own log files
    pub log_dir: PathBuf,
}

/// On-disk shape of `config.yaml`; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    stacks_dir: Option<PathBuf>,
    #[serde(default)]
    log_dir: Option<PathBuf>,
}

impl DevstackConfig {
    /// Directory layout rooted at `home`, ignoring any config file.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            stacks_dir: home.join("stacks"),
            log_dir: home.join("logs"),
            home,
        }
    }

    /// Load the configuration.
    ///
    /// `home_override` wins over `DEVSTACK_HOME`, which wins over
    /// `~/.devstack`.
    pub fn load(home_override: Option<PathBuf>) -> Result<Self> {
        let home = match home_override {
            Some(home) => home,
            None => default_home()?,
        };
        Self::load_from(&home)
    }

    /// Load the configuration rooted at `home`, applying `config.yaml` if present.
    pub fn load_from(home: &Path) -> Result<Self> {
        let mut config = Self::with_home(home);
        let config_path = home.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            debug!(home = %home.display(), "no config file, using defaults");
            return Ok(config);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| DevstackError::io("reading config", &config_path, e))?;

        // An empty file deserializes to null rather than an empty mapping
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(&content).map_err(|e| DevstackError::ConfigInvalid {
                path: config_path.clone(),
                message: e.to_string(),
            })?
        };

        if let Some(stacks_dir) = file.stacks_dir {
            config.stacks_dir = stacks_dir;
        }
        if let Some(log_dir) = file.log_dir {
            config.log_dir = log_dir;
        }

        debug!(
            config = %config_path.display(),
            stacks_dir = %config.stacks_dir.display(),
            "loaded config file"
        );
        Ok(config)
    }
}

/// Get the default home directory.
///
/// Returns `$DEVSTACK_HOME` if set, otherwise `~/.devstack/`.
pub fn default_home() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".devstack"))
        .ok_or(DevstackError::HomeNotFound)
}
