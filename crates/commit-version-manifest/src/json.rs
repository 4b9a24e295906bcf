//! `package.json` style manifests

use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::{ManifestError, Result};

/// Manifest whose version lives in a top-level JSON `version` string
#[derive(Debug, Clone)]
pub struct JsonManifest {
    path: PathBuf,
}

impl JsonManifest {
    /// Manifest at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the manifest
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the `version` field
    ///
    /// Missing, non-string and empty values are reported as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn read_version(&self) -> Result<Option<String>> {
        let doc = self.load()?;
        Ok(doc
            .get("version")
            .and_then(Value::as_str)
            .filter(|version| !version.is_empty())
            .map(str::to_owned))
    }

    /// Replace the `version` field, keeping every other key in place
    ///
    /// Returns the previous value. The document is re-rendered through
    /// `serde_json`, so number literals keep their value but not necessarily
    /// their spelling (`1.0e3` becomes `1000.0`). The new contents replace the
    /// file atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or written, or if
    /// its root is not an object.
    pub fn write_version(&self, version: &str) -> Result<Option<String>> {
        let mut doc = self.load()?;
        let Some(object) = doc.as_object_mut() else {
            return Err(ManifestError::NotAnObject(self.path.clone()));
        };
        let previous = object
            .insert("version".to_owned(), Value::String(version.to_owned()))
            .and_then(|old| old.as_str().map(str::to_owned));

        let mut rendered = serde_json::to_string_pretty(&doc).map_err(|source| ManifestError::Json {
            path: self.path.clone(),
            source,
        })?;
        rendered.push('\n');
        self.replace_contents(rendered.as_bytes())
            .map_err(|source| ManifestError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(previous)
    }

    fn replace_contents(&self, contents: &[u8]) -> io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn load(&self) -> Result<Value> {
        let contents = fs::read_to_string(&self.path).map_err(|source| ManifestError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ManifestError::Json {
            path: self.path.clone(),
            source,
        })
    }
}
