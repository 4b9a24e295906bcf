//! Manifest format detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported manifest encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestFormat {
    /// `package.json` style document with a top-level `version`
    Json,
    /// `Cargo.toml` style document with `[package] version`
    Toml,
}

impl ManifestFormat {
    /// Infer the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }

    /// Lowercase name used in configuration files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_extension() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("web/package.json")),
            Some(ManifestFormat::Json)
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("Cargo.TOML")),
            Some(ManifestFormat::Toml)
        );
        assert_eq!(ManifestFormat::from_path(Path::new("VERSION")), None);
        assert_eq!(ManifestFormat::from_path(Path::new("setup.cfg")), None);
    }
}
