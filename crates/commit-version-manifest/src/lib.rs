//! Project manifest access for commit-version
//!
//! This crate reads the version recorded in `package.json` or `Cargo.toml`
//! manifests and can stamp a new version into JSON manifests.

mod cargo;
mod error;
mod format;
mod json;

pub use cargo::TomlManifest;
pub use error::{ManifestError, Result};
pub use format::ManifestFormat;
pub use json::JsonManifest;

use commit_version_core::ManifestStore;
use std::path::{Path, PathBuf};
use tracing::info;

/// A manifest of either supported format
#[derive(Debug, Clone)]
pub enum Manifest {
    /// JSON manifest
    Json(JsonManifest),
    /// TOML manifest
    Toml(TomlManifest),
}

impl Manifest {
    /// Open the manifest at `path`, inferring the format when `format` is `None`
    ///
    /// The file itself is not touched until a read or write.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnknownFormat`] if no format is given and the
    /// extension is not recognised.
    pub fn open(path: impl Into<PathBuf>, format: Option<ManifestFormat>) -> Result<Self> {
        let path = path.into();
        let Some(format) = format.or_else(|| ManifestFormat::from_path(&path)) else {
            return Err(ManifestError::UnknownFormat(path));
        };
        Ok(match format {
            ManifestFormat::Json => Self::Json(JsonManifest::new(path)),
            ManifestFormat::Toml => Self::Toml(TomlManifest::new(path)),
        })
    }

    /// Encoding of the manifest
    #[must_use]
    pub const fn format(&self) -> ManifestFormat {
        match self {
            Self::Json(_) => ManifestFormat::Json,
            Self::Toml(_) => ManifestFormat::Toml,
        }
    }

    /// Location of the manifest
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Json(m) => m.path(),
            Self::Toml(m) => m.path(),
        }
    }

    /// Read the recorded version
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn read_version(&self) -> Result<Option<String>> {
        match self {
            Self::Json(m) => m.read_version(),
            Self::Toml(m) => m.read_version(),
        }
    }

    /// Check that [`Manifest::write_version`] is supported for this format
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ReadOnly`] for TOML manifests.
    pub fn ensure_writable(&self) -> Result<()> {
        match self {
            Self::Json(_) => Ok(()),
            Self::Toml(_) => Err(self.read_only()),
        }
    }

    /// Stamp `version` into the manifest, returning the previous value
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ReadOnly`] for TOML manifests, or an I/O or
    /// parse error for JSON manifests.
    pub fn write_version(&self, version: &str) -> Result<Option<String>> {
        let Self::Json(m) = self else {
            return Err(self.read_only());
        };
        let previous = m.write_version(version)?;
        info!(path = %m.path().display(), %version, "Stamped manifest version");
        Ok(previous)
    }

    fn read_only(&self) -> ManifestError {
        ManifestError::ReadOnly {
            path: self.path().to_path_buf(),
            format: self.format(),
        }
    }
}

impl ManifestStore for Manifest {
    type Error = ManifestError;

    fn read_version(&self) -> Result<Option<String>> {
        Self::read_version(self)
    }
}

impl ManifestStore for JsonManifest {
    type Error = ManifestError;

    fn read_version(&self) -> Result<Option<String>> {
        Self::read_version(self)
    }
}

impl ManifestStore for TomlManifest {
    type Error = ManifestError;

    fn read_version(&self) -> Result<Option<String>> {
        Self::read_version(self)
    }
}
