//! `Cargo.toml` style manifests

use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

use crate::{ManifestError, Result};

/// Manifest whose version lives in `[package]` or `[workspace.package]`
#[derive(Debug, Clone)]
pub struct TomlManifest {
    path: PathBuf,
}

impl TomlManifest {
    /// Manifest at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the manifest
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `package.version`, falling back to `workspace.package.version`
    ///
    /// An inherited `version.workspace = true` resolves against the
    /// workspace table of the same file only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn read_version(&self) -> Result<Option<String>> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ManifestError::Io {
            path: self.path.clone(),
            source,
        })?;
        let doc: Table = toml::from_str(&contents).map_err(|source| ManifestError::Toml {
            path: self.path.clone(),
            source,
        })?;

        let package = version_in(doc.get("package"));
        let workspace = doc
            .get("workspace")
            .and_then(|ws| version_in(ws.get("package")));
        Ok(package.or(workspace).filter(|version| !version.is_empty()))
    }
}

fn version_in(table: Option<&Value>) -> Option<String> {
    table?.get("version")?.as_str().map(str::to_owned)
}
