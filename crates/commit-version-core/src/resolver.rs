//! Resolution of the commit-derived version and its manifest consistency check.

use anyhow::Error;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use tracing::{debug, warn};

use crate::commit::CommitInfo;
use crate::manifest::ManifestVersion;
use crate::version::{CalculatedVersion, CommitCount, calculate_version};
use crate::NOT_AVAILABLE;

/// Read access to the version-control history.
pub trait RepositoryInspector {
    /// Error type bubbled up from the backing history reader.
    type Error: Into<Error>;

    /// Count commits reachable from the current tip.
    ///
    /// # Errors
    /// Returns an inspector-specific error when the history cannot be read.
    fn commit_count(&self) -> Result<u64, Self::Error>;

    /// Message of the most recent commit.
    ///
    /// # Errors
    /// Returns an inspector-specific error when there is no readable tip.
    fn last_commit_message(&self) -> Result<String, Self::Error>;

    /// Author name of the most recent commit.
    ///
    /// # Errors
    /// Returns an inspector-specific error when there is no readable tip.
    fn last_commit_author(&self) -> Result<String, Self::Error>;

    /// Commit time of the most recent commit in RFC 3339.
    ///
    /// # Errors
    /// Returns an inspector-specific error when there is no readable tip.
    fn last_commit_time(&self) -> Result<Option<String>, Self::Error> {
        Ok(None)
    }
}

/// Read access to the version recorded in a project manifest.
pub trait ManifestStore {
    /// Error type bubbled up from the manifest reader.
    type Error: Into<Error>;

    /// Read the version field. `Ok(None)` when the field is absent.
    ///
    /// # Errors
    /// Returns a store-specific error when the manifest cannot be read or parsed.
    fn read_version(&self) -> Result<Option<String>, Self::Error>;
}

/// Outcome of comparing the calculated version against the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsistencyResult {
    /// Both versions render identically.
    Match,
    /// The versions differ.
    Mismatch {
        /// Version derived from the commit count.
        calculated: String,
        /// Version recorded in the manifest (`N/A` when absent).
        manifest: String,
    },
}

impl ConsistencyResult {
    /// Compare the rendered calculated version against the manifest value.
    #[must_use]
    pub fn compare(calculated: &CalculatedVersion, manifest: &ManifestVersion) -> Self {
        let calculated = calculated.to_string();
        if manifest.as_recorded() == Some(calculated.as_str()) {
            Self::Match
        } else {
            Self::Mismatch {
                calculated,
                manifest: manifest.as_str().to_owned(),
            }
        }
    }

    /// Returns true for [`ConsistencyResult::Match`].
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

/// Everything gathered in one resolution pass.
#[derive(Debug, Clone, Serialize)]
pub struct VersionReport {
    /// Commits reachable from the tip (`0` when unavailable).
    pub commit_count: CommitCount,
    /// Version derived from `commit_count`.
    #[serde(serialize_with = "serialize_display")]
    pub calculated: CalculatedVersion,
    /// Version recorded in the manifest.
    pub manifest: ManifestVersion,
    /// Most recent commit.
    pub last_commit: CommitInfo,
    /// Comparison of `calculated` and `manifest`.
    pub consistency: ConsistencyResult,
}

fn serialize_display<T, S>(value: &T, s: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    s.collect_str(value)
}

/// Derives a version from history and checks it against the manifest.
///
/// Collaborator failures never escape: counts fall back to `0` and strings to `N/A`.
#[derive(Debug, Clone)]
pub struct VersionResolver<R, M> {
    inspector: R,
    manifest: M,
}

impl<R, M> VersionResolver<R, M> {
    /// Wrap the two collaborators.
    pub const fn new(inspector: R, manifest: M) -> Self {
        Self { inspector, manifest }
    }

    /// Borrow the history inspector.
    pub const fn inspector(&self) -> &R {
        &self.inspector
    }

    /// Borrow the manifest store.
    pub const fn manifest(&self) -> &M {
        &self.manifest
    }
}

impl<R: RepositoryInspector, M: ManifestStore> VersionResolver<R, M> {
    /// Commit count, or `0` when the history cannot be read.
    pub fn commit_count(&self) -> CommitCount {
        match self.inspector.commit_count() {
            Ok(count) => {
                debug!(count, "Counted commits");
                CommitCount(count)
            }
            Err(err) => {
                let err: Error = err.into();
                warn!("Failed to count commits, using 0: {err:#}");
                CommitCount::default()
            }
        }
    }

    /// Message and author of the last commit, each `N/A` when unavailable.
    pub fn last_commit_info(&self) -> CommitInfo {
        let message = or_not_available(self.inspector.last_commit_message(), "message");
        let author = or_not_available(self.inspector.last_commit_author(), "author");
        let committed_at = match self.inspector.last_commit_time() {
            Ok(time) => time,
            Err(err) => {
                let err: Error = err.into();
                debug!("Failed to read last commit time: {err:#}");
                None
            }
        };
        CommitInfo {
            message,
            author,
            committed_at,
        }
    }

    /// Version recorded in the manifest, or the sentinel.
    pub fn manifest_version(&self) -> ManifestVersion {
        match self.manifest.read_version() {
            Ok(value) => {
                let version = ManifestVersion::from_field(value);
                debug!(%version, "Read manifest version");
                version
            }
            Err(err) => {
                let err: Error = err.into();
                warn!("Failed to read manifest version: {err:#}");
                ManifestVersion::NotAvailable
            }
        }
    }

    /// Compare the version derived from the current commit count with the manifest.
    pub fn check_consistency(&self) -> ConsistencyResult {
        let calculated = calculate_version(self.commit_count());
        ConsistencyResult::compare(&calculated, &self.manifest_version())
    }

    /// Collect every value in one pass, reading the commit count once.
    pub fn report(&self) -> VersionReport {
        let commit_count = self.commit_count();
        let calculated = calculate_version(commit_count);
        let manifest = self.manifest_version();
        let consistency = ConsistencyResult::compare(&calculated, &manifest);
        VersionReport {
            commit_count,
            calculated,
            manifest,
            last_commit: self.last_commit_info(),
            consistency,
        }
    }
}

fn or_not_available<E: Into<Error>>(value: Result<String, E>, field: &str) -> String {
    match value {
        Ok(v) => v,
        Err(err) => {
            let err: Error = err.into();
            warn!("Failed to read last commit {field}: {err:#}");
            NOT_AVAILABLE.to_owned()
        }
    }
}
