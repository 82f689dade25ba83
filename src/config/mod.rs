pub mod bundled;
pub mod env;
pub mod options;
pub mod schema;
pub mod user;
pub mod variable;

use std::path::{Path, PathBuf};

use crate::error::{DagcutterError, Result};

pub use bundled::TemplateDir;
pub use env::EnvSettings;
pub use options::{CiTool, License};
pub use schema::TemplateConfig;
pub use user::{load_user_config, UserConfig};

pub const MANIFEST_FILE: &str = "dagcutter.toml";

/// A template directory after its manifest has been loaded.
pub struct ResolvedTemplate {
    pub config: TemplateConfig,
    /// Root of the files to render (`<template>/template`).
    pub content_dir: PathBuf,
}

/// Load and validate a TemplateConfig from a dagcutter.toml file.
pub fn load_config(path: &Path) -> Result<TemplateConfig> {
    let config_path = if path.ends_with(MANIFEST_FILE) {
        path.to_path_buf()
    } else {
        path.join(MANIFEST_FILE)
    };

    if !config_path.exists() {
        return Err(DagcutterError::ConfigNotFound { path: config_path });
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| DagcutterError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let config: TemplateConfig =
        toml::from_str(&content).map_err(|e| DagcutterError::ConfigParse {
            path: config_path.clone(),
            source: e,
        })?;

    config.validate()?;

    Ok(config)
}

pub fn resolve_template(template_dir: &Path) -> Result<ResolvedTemplate> {
    let config = load_config(template_dir)?;
    Ok(ResolvedTemplate {
        config,
        content_dir: template_dir.join("template"),
    })
}
