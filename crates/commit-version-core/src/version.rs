use serde::{Deserialize, Serialize};
use std::fmt;

/// Commits contributing one minor bump.
///
/// Ten commits per minor release is an arbitrary heuristic carried over for
/// compatibility with existing manifests; it encodes no release policy.
pub const COMMITS_PER_MINOR: u64 = 10;

/// Number of commits reachable from the current history tip.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitCount(pub u64);

impl CommitCount {
    /// Raw commit count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CommitCount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Version derived from a commit count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct CalculatedVersion {
    /// Always zero.
    pub major: u64,
    /// `count / 10`.
    pub minor: u64,
    /// `count % 10`.
    pub patch: u64,
}

impl CalculatedVersion {
    /// Derive the version for `count`.
    #[must_use]
    pub const fn from_commit_count(count: CommitCount) -> Self {
        Self {
            major: 0,
            minor: count.0 / COMMITS_PER_MINOR,
            patch: count.0 % COMMITS_PER_MINOR,
        }
    }
}

impl From<CommitCount> for CalculatedVersion {
    fn from(count: CommitCount) -> Self {
        Self::from_commit_count(count)
    }
}

impl fmt::Display for CalculatedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Compute the version label for a commit count.
///
/// Total over every `u64`; the same count always yields the same version.
#[must_use]
pub const fn calculate_version(count: CommitCount) -> CalculatedVersion {
    CalculatedVersion::from_commit_count(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(count: u64) -> (u64, u64, u64) {
        let v = calculate_version(CommitCount(count));
        (v.major, v.minor, v.patch)
    }

    #[test]
    fn boundaries() {
        assert_eq!(version(0), (0, 0, 0));
        assert_eq!(version(9), (0, 0, 9));
        assert_eq!(version(10), (0, 1, 0));
        assert_eq!(version(109), (0, 10, 9));
    }

    #[test]
    fn splits_count_into_minor_and_patch() {
        for count in [1_u64, 23, 99, 100, 4_321, u64::MAX] {
            assert_eq!(version(count), (0, count / 10, count % 10));
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let first = calculate_version(CommitCount(57));
        let second = calculate_version(CommitCount(57));
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn renders_dotted_triple() {
        assert_eq!(calculate_version(CommitCount(23)).to_string(), "0.2.3");
        assert_eq!(calculate_version(CommitCount(109)).to_string(), "0.10.9");
    }
}
