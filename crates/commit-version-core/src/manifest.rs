use serde::{Serialize, Serializer};
use std::fmt;

use crate::NOT_AVAILABLE;

/// Version recorded in the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ManifestVersion {
    /// Value of the manifest's version field.
    Recorded(String),
    /// Manifest missing, field absent, or unparsable.
    #[default]
    NotAvailable,
}

impl ManifestVersion {
    /// Build from an optional field value. Blank values count as absent.
    #[must_use]
    pub fn from_field(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::Recorded(v),
            _ => Self::NotAvailable,
        }
    }

    /// Recorded value, if any.
    #[must_use]
    pub fn as_recorded(&self) -> Option<&str> {
        match self {
            Self::Recorded(v) => Some(v),
            Self::NotAvailable => None,
        }
    }

    /// String form used for comparison and display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.as_recorded().unwrap_or(NOT_AVAILABLE)
    }

    /// Returns true for the sentinel.
    #[must_use]
    pub const fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable)
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ManifestVersion {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_is_not_available() {
        assert!(ManifestVersion::from_field(None).is_not_available());
        assert!(ManifestVersion::from_field(Some(String::new())).is_not_available());
        assert!(ManifestVersion::from_field(Some("  ".into())).is_not_available());
    }

    #[test]
    fn sentinel_renders_as_na() {
        assert_eq!(ManifestVersion::NotAvailable.to_string(), "N/A");
        assert_eq!(ManifestVersion::Recorded("1.2.3".into()).to_string(), "1.2.3");
    }
}
