use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DagcutterError, Result};

/// User-level defaults loaded from `~/.config/dagcutter/config.toml`
/// or from the file given with `--config-file`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Answers used in place of the template defaults.
    #[serde(default)]
    pub default_context: BTreeMap<String, String>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dagcutter").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    let path = match config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Load an explicit config file. Unlike the user config, a missing file is an error.
pub fn load_config_file(path: &Path) -> Result<UserConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DagcutterError::Io {
        context: format!("reading config file {}", path.display()),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| DagcutterError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}
