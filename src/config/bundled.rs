use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};

use crate::error::{DagcutterError, Result};

/// The Airflow template compiled into the binary.
static BUNDLED: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/scaffold");

/// A template directory on disk: either one the user pointed at, or the
/// bundled template unpacked into a temporary directory.
#[derive(Debug)]
pub enum TemplateDir {
    Local(PathBuf),
    /// Removed when dropped.
    Bundled(tempfile::TempDir),
}

impl TemplateDir {
    /// Use `path` when given, otherwise unpack the bundled template.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Ok(TemplateDir::Local(p.to_path_buf())),
            None => unpack_bundled(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TemplateDir::Local(p) => p,
            TemplateDir::Bundled(dir) => dir.path(),
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, TemplateDir::Bundled(_))
    }
}

fn unpack_bundled() -> Result<TemplateDir> {
    let dir = tempfile::tempdir().map_err(|e| DagcutterError::Io {
        context: "creating temp directory for the bundled template".into(),
        source: e,
    })?;
    BUNDLED.extract(dir.path()).map_err(|e| DagcutterError::Io {
        context: format!("unpacking the bundled template into {}", dir.path().display()),
        source: e,
    })?;
    tracing::debug!(path = %dir.path().display(), "unpacked bundled template");
    Ok(TemplateDir::Bundled(dir))
}
