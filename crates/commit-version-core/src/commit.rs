use serde::{Deserialize, Serialize};

use crate::NOT_AVAILABLE;

/// Message and author of the most recent commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Trimmed commit message, or `N/A`.
    pub message: String,
    /// Author name, or `N/A`.
    pub author: String,
    /// Commit time in RFC 3339, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committed_at: Option<String>,
}

impl CommitInfo {
    /// Info used when no history can be inspected.
    #[must_use]
    pub fn not_available() -> Self {
        Self {
            message: NOT_AVAILABLE.to_owned(),
            author: NOT_AVAILABLE.to_owned(),
            committed_at: None,
        }
    }

    /// Returns true when neither message nor author could be read.
    #[must_use]
    pub fn is_not_available(&self) -> bool {
        self.message == NOT_AVAILABLE && self.author == NOT_AVAILABLE
    }
}

impl Default for CommitInfo {
    fn default() -> Self {
        Self::not_available()
    }
}
