//! Pure data types for the repository model.
//! No I/O, no dependencies on external crates beyond std and chrono.

use std::fmt;

/// Whether a commit is already part of a main branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitStatus {
    #[default]
    Unmerged,
    Merged,
}

/// A git commit with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub short_hash: String,
    pub message: String,
    pub author: String,
    pub timestamp: i64,
    pub status: CommitStatus,
}

impl Commit {
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }

    pub fn is_merged(&self) -> bool {
        self.status == CommitStatus::Merged
    }

    pub fn relative_time(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let diff = now - self.timestamp;

        if diff < 60 {
            "just now".to_string()
        } else if diff < 3600 {
            let mins = diff / 60;
            format!("{} minute{} ago", mins, if mins == 1 { "" } else { "s" })
        } else if diff < 86400 {
            let hours = diff / 3600;
            format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
        } else if diff < 604800 {
            let days = diff / 86400;
            format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
        } else if diff < 2592000 {
            let weeks = diff / 604800;
            format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
        } else {
            let months = diff / 2592000;
            format!("{} month{} ago", months, if months == 1 { "" } else { "s" })
        }
    }
}

/// Two-letter porcelain-style status of a working tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStatus {
    pub staged: char,
    pub unstaged: char,
}

impl ChangeStatus {
    pub const UNTRACKED: Self = Self {
        staged: '?',
        unstaged: '?',
    };

    pub fn has_staged(&self) -> bool {
        !matches!(self.staged, ' ' | '?')
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.staged, self.unstaged)
    }
}

/// A changed file in the working tree or index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub status: ChangeStatus,
}

/// A contiguous run of deleted lines in one file, in pre-image coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedLineHunk {
    pub filename: String,
    /// 1-based line in the pre-image where the deletions begin.
    pub start_line: u32,
    pub deleted_lines: u32,
}

/// Result of parsing a zero-context diff for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDiff {
    pub hunks: Vec<DeletedLineHunk>,
    /// Set when some hunk only added lines and was dropped.
    pub has_only_added_hunks: bool,
}

/// Which diff a fixup change set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSource {
    Staged,
    Unstaged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_is_first_line() {
        let commit = Commit {
            hash: "abc1234567".to_string(),
            short_hash: "abc1234".to_string(),
            message: "Fix parser\n\nLonger body".to_string(),
            author: "Alice".to_string(),
            timestamp: 0,
            status: CommitStatus::Unmerged,
        };
        assert_eq!(commit.summary(), "Fix parser");
        assert!(!commit.is_merged());
    }

    #[test]
    fn change_status_display() {
        let status = ChangeStatus {
            staged: 'M',
            unstaged: ' ',
        };
        assert_eq!(status.to_string(), "M ");
        assert!(status.has_staged());
        assert!(!ChangeStatus::UNTRACKED.has_staged());
    }
}
