//! Service wiring the resolver to configured collaborators.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use commit_version_core::{
    CalculatedVersion, CommitCount, RepositoryInspector, VersionReport, VersionResolver, calculate_version,
};
use commit_version_manifest::Manifest;
use commit_version_store_git::{GitCliInspector, GitInspector, InspectError, UnavailableInspector, resolve_workdir};
use tracing::debug;

use crate::config::{ConfigOverrides, InspectorBackend, InspectorConfig, ProjectConfig};

/// History inspector selected by configuration.
pub enum Inspector {
    /// In-process libgit2 reader.
    Libgit2(GitInspector),
    /// External `git` executable.
    Cli(GitCliInspector),
    /// No repository could be opened.
    Unavailable(UnavailableInspector),
}

impl Inspector {
    /// Build the configured backend for `workdir`.
    ///
    /// A libgit2 backend that cannot open a repository degrades to
    /// [`Inspector::Unavailable`] instead of failing.
    pub fn from_config(workdir: &Path, config: &InspectorConfig) -> Self {
        match config.backend {
            InspectorBackend::Libgit2 => match GitInspector::discover(workdir) {
                Ok(inspector) => Self::Libgit2(inspector),
                Err(err) => {
                    let reason = format!("{:#}", anyhow::Error::from(err));
                    debug!("{reason}");
                    Self::Unavailable(UnavailableInspector::new(reason))
                }
            },
            InspectorBackend::GitCli => {
                Self::Cli(GitCliInspector::with_program(&config.git_binary, workdir))
            }
        }
    }

    /// Backend name for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Libgit2(_) => "libgit2",
            Self::Cli(_) => "git-cli",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

impl RepositoryInspector for Inspector {
    type Error = InspectError;

    fn commit_count(&self) -> Result<u64, Self::Error> {
        match self {
            Self::Libgit2(i) => i.commit_count(),
            Self::Cli(i) => i.commit_count(),
            Self::Unavailable(i) => i.commit_count(),
        }
    }

    fn last_commit_message(&self) -> Result<String, Self::Error> {
        match self {
            Self::Libgit2(i) => i.last_commit_message(),
            Self::Cli(i) => i.last_commit_message(),
            Self::Unavailable(i) => i.last_commit_message(),
        }
    }

    fn last_commit_author(&self) -> Result<String, Self::Error> {
        match self {
            Self::Libgit2(i) => i.last_commit_author(),
            Self::Cli(i) => i.last_commit_author(),
            Self::Unavailable(i) => i.last_commit_author(),
        }
    }

    fn last_commit_time(&self) -> Result<Option<String>, Self::Error> {
        match self {
            Self::Libgit2(i) => i.last_commit_time(),
            Self::Cli(i) => i.last_commit_time(),
            Self::Unavailable(i) => i.last_commit_time(),
        }
    }
}

/// Result of stamping the calculated version into the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampOutcome {
    /// Manifest location.
    pub path: PathBuf,
    /// Version recorded before stamping.
    pub previous: Option<String>,
    /// Version derived from history.
    pub version: CalculatedVersion,
    /// Whether the file was rewritten.
    pub written: bool,
}

/// Service façade over a configured [`VersionResolver`].
pub struct VersionService {
    workdir: PathBuf,
    resolver: VersionResolver<Inspector, Manifest>,
}

impl VersionService {
    /// Discover the working tree from `cwd_or_repo`, load its configuration
    /// and apply `overrides`.
    ///
    /// # Errors
    /// Returns an error when the configuration is unreadable or invalid.
    pub fn open(cwd_or_repo: impl AsRef<Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let workdir = resolve_workdir(cwd_or_repo);
        let config = ProjectConfig::from_workdir(&workdir)?.with_overrides(overrides);
        config.validate()?;
        Self::from_config(workdir, &config)
    }

    /// Build the service from an already loaded configuration.
    ///
    /// # Errors
    /// Returns an error when the manifest format cannot be determined.
    pub fn from_config(workdir: PathBuf, config: &ProjectConfig) -> Result<Self> {
        let format = config.manifest.resolve_format()?;
        let manifest = Manifest::open(config.manifest.location(&workdir), Some(format))?;
        let inspector = Inspector::from_config(&workdir, &config.inspector);
        Ok(Self {
            workdir,
            resolver: VersionResolver::new(inspector, manifest),
        })
    }

    /// Working tree the service operates on.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Underlying resolver.
    pub const fn resolver(&self) -> &VersionResolver<Inspector, Manifest> {
        &self.resolver
    }

    /// Collect a full report.
    pub fn report(&self) -> VersionReport {
        self.resolver.report()
    }

    /// Write the version derived from history into the manifest.
    ///
    /// Unlike the resolver, stamping refuses to fall back to a zero count.
    ///
    /// # Errors
    /// Returns an error when history cannot be read or the manifest cannot be written.
    pub fn stamp(&self, dry_run: bool) -> Result<StampOutcome> {
        let count = self
            .resolver
            .inspector()
            .commit_count()
            .context("cannot stamp a version without readable commit history")?;
        let version = calculate_version(CommitCount(count));
        let manifest = self.resolver.manifest();
        let path = manifest.path().to_path_buf();

        if dry_run {
            // A preview must fail exactly where the real stamp would.
            manifest
                .ensure_writable()
                .with_context(|| format!("failed to stamp {}", path.display()))?;
            let previous = manifest
                .read_version()
                .with_context(|| format!("failed to read {}", path.display()))?;
            return Ok(StampOutcome {
                path,
                previous,
                version,
                written: false,
            });
        }

        let previous = manifest
            .write_version(&version.to_string())
            .with_context(|| format!("failed to stamp {}", path.display()))?;
        Ok(StampOutcome {
            path,
            previous,
            version,
            written: true,
        })
    }
}
