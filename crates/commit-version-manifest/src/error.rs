//! Error types for manifest access

use std::io;
use std::path::PathBuf;

use crate::ManifestFormat;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur while reading or stamping a manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Manifest file could not be read or written
    #[error("I/O error on {}", .path.display())]
    Io {
        /// Manifest path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Manifest is not valid JSON
    #[error("Failed to parse {} as JSON", .path.display())]
    Json {
        /// Manifest path
        path: PathBuf,
        /// Parser error
        source: serde_json::Error,
    },

    /// Manifest is not valid TOML
    #[error("Failed to parse {} as TOML", .path.display())]
    Toml {
        /// Manifest path
        path: PathBuf,
        /// Parser error
        source: toml::de::Error,
    },

    /// Format could not be inferred from the file name
    #[error("Cannot infer manifest format for {}; expected a .json or .toml file", .0.display())]
    UnknownFormat(PathBuf),

    /// Stamping is not supported for this format
    #[error("{format} manifest {} is read-only", .path.display())]
    ReadOnly {
        /// Manifest path
        path: PathBuf,
        /// Manifest format
        format: ManifestFormat,
    },

    /// JSON manifest root is not an object
    #[error("Manifest {} does not contain a JSON object", .0.display())]
    NotAnObject(PathBuf),
}
