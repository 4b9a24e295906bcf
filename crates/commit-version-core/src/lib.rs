//! Domain types & resolution logic for commit-derived versions.

/// Last-commit metadata.
pub mod commit;
/// Manifest-recorded version.
pub mod manifest;
pub mod resolver;
/// Commit count to version arithmetic.
pub mod version;

pub use commit::CommitInfo;
pub use manifest::ManifestVersion;
pub use resolver::{ConsistencyResult, ManifestStore, RepositoryInspector, VersionReport, VersionResolver};
pub use version::{COMMITS_PER_MINOR, CalculatedVersion, CommitCount, calculate_version};

/// Sentinel rendered when a value could not be read.
pub const NOT_AVAILABLE: &str = "N/A";
