//! Git-backed history inspection for commit-version.

mod cli;
mod error;

pub use cli::GitCliInspector;
pub use error::InspectError;

use commit_version_core::RepositoryInspector;
use git2::{Commit, Repository};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

/// Result type for inspection operations.
pub type Result<T> = std::result::Result<T, InspectError>;

/// In-process history reader based on libgit2.
pub struct GitInspector {
    repo: Repository,
}

impl GitInspector {
    /// Discover and open the repository from `cwd_or_repo`.
    ///
    /// # Errors
    /// Returns [`InspectError::NotARepository`] if no repository encloses the path.
    pub fn discover(cwd_or_repo: impl AsRef<Path>) -> Result<Self> {
        let path = cwd_or_repo.as_ref();
        let repo = Repository::discover(path).map_err(|source| InspectError::NotARepository {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %repo.path().display(), "Opened repository");
        Ok(Self { repo })
    }

    fn head_commit(&self) -> Result<Commit<'_>> {
        let head = self.repo.head()?;
        Ok(head.peel_to_commit()?)
    }
}

impl RepositoryInspector for GitInspector {
    type Error = InspectError;

    fn commit_count(&self) -> Result<u64> {
        let mut walk = self.repo.revwalk()?;
        walk.push_head()?;
        let mut count = 0_u64;
        for oid in walk {
            oid?;
            count += 1;
        }
        Ok(count)
    }

    fn last_commit_message(&self) -> Result<String> {
        let commit = self.head_commit()?;
        Ok(String::from_utf8_lossy(commit.message_bytes()).trim().to_owned())
    }

    fn last_commit_author(&self) -> Result<String> {
        let commit = self.head_commit()?;
        let author = commit.author();
        Ok(String::from_utf8_lossy(author.name_bytes()).into_owned())
    }

    fn last_commit_time(&self) -> Result<Option<String>> {
        let commit = self.head_commit()?;
        let time = commit.time();
        let offset = UtcOffset::from_whole_seconds(time.offset_minutes() * 60)
            .map_err(|err| InspectError::InvalidTime(err.to_string()))?;
        let when = OffsetDateTime::from_unix_timestamp(time.seconds())
            .map_err(|err| InspectError::InvalidTime(err.to_string()))?
            .to_offset(offset);
        let rendered = when
            .format(&Rfc3339)
            .map_err(|err| InspectError::InvalidTime(err.to_string()))?;
        Ok(Some(rendered))
    }
}

/// Inspector standing in for a repository that could not be opened.
///
/// Every query fails with the stored reason, so callers degrade to sentinels.
#[derive(Debug, Clone)]
pub struct UnavailableInspector {
    reason: String,
}

impl UnavailableInspector {
    /// Record why inspection is impossible.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Reason given at construction.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fail<T>(&self) -> Result<T> {
        Err(InspectError::Unavailable(self.reason.clone()))
    }
}

impl RepositoryInspector for UnavailableInspector {
    type Error = InspectError;

    fn commit_count(&self) -> Result<u64> {
        self.fail()
    }

    fn last_commit_message(&self) -> Result<String> {
        self.fail()
    }

    fn last_commit_author(&self) -> Result<String> {
        self.fail()
    }

    fn last_commit_time(&self) -> Result<Option<String>> {
        self.fail()
    }
}

/// Resolve the directory commands should run in for `cwd_or_repo`.
///
/// Falls back to the path itself when no enclosing working tree exists.
#[must_use]
pub fn resolve_workdir(cwd_or_repo: impl AsRef<Path>) -> PathBuf {
    let path = cwd_or_repo.as_ref();
    Repository::discover(path)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use tempfile::TempDir;

    fn commit_n(repo: &Repository, n: usize) -> std::result::Result<(), git2::Error> {
        let tree_oid = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_oid)?;
        for i in 0..n {
            let sig = Signature::new("alice", "alice@example.invalid", &Time::new(1_714_564_800, 120))?;
            let parent = match repo.head() {
                Ok(head) => Some(head.peel_to_commit()?),
                Err(_) => None,
            };
            let parents: Vec<&Commit<'_>> = parent.iter().collect();
            repo.commit(Some("HEAD"), &sig, &sig, &format!("commit {i}\n\n"), &tree, &parents)?;
        }
        Ok(())
    }

    #[test]
    fn counts_and_describes_head() -> anyhow::Result<()> {
        let dir = TempDir::with_prefix("commit-version-inspect-")?;
        let repo = Repository::init(dir.path())?;
        commit_n(&repo, 3)?;

        let inspector = GitInspector::discover(dir.path())?;
        assert_eq!(inspector.commit_count()?, 3);
        assert_eq!(inspector.last_commit_message()?, "commit 2");
        assert_eq!(inspector.last_commit_author()?, "alice");
        assert_eq!(
            inspector.last_commit_time()?.as_deref(),
            Some("2024-05-01T14:00:00+02:00")
        );
        Ok(())
    }

    #[test]
    fn unborn_head_is_an_error() -> anyhow::Result<()> {
        let dir = TempDir::with_prefix("commit-version-inspect-")?;
        Repository::init(dir.path())?;

        let inspector = GitInspector::discover(dir.path())?;
        assert!(inspector.commit_count().is_err());
        assert!(inspector.last_commit_message().is_err());
        assert!(inspector.last_commit_author().is_err());
        Ok(())
    }

    #[test]
    fn discover_outside_repository_fails() -> anyhow::Result<()> {
        let dir = TempDir::with_prefix("commit-version-inspect-")?;
        let missing = dir.path().join("does-not-exist");
        assert!(matches!(
            GitInspector::discover(&missing),
            Err(InspectError::NotARepository { .. })
        ));
        Ok(())
    }

    #[test]
    fn unavailable_inspector_always_fails() {
        let inspector = UnavailableInspector::new("no repository");
        assert_eq!(inspector.reason(), "no repository");
        assert!(matches!(
            inspector.commit_count(),
            Err(InspectError::Unavailable(reason)) if reason == "no repository"
        ));
        assert!(inspector.last_commit_time().is_err());
    }
}
