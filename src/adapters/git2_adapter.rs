//! Git2 implementation of the GitRepo port.

use crate::domain::{ChangeStatus, Commit, CommitStatus, FileChange};
use crate::ports::GitRepo;
use anyhow::{anyhow, Context, Result};
use git2::{Oid, Repository, Sort, Status, StatusOptions};
use std::path::{Path, PathBuf};

pub struct Git2Repo {
    repo: Repository,
}

impl Git2Repo {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("Failed to open git repository")?;
        Ok(Self { repo })
    }

    pub fn open_current_dir() -> Result<Self> {
        Self::open(Path::new("."))
    }

    /// True when `oid` is `merge_base` itself or one of its ancestors.
    fn is_merged(&self, oid: Oid, merge_base: Option<Oid>) -> Result<bool> {
        match merge_base {
            None => Ok(false),
            Some(base) if base == oid => Ok(true),
            Some(base) => Ok(self.repo.graph_descendant_of(base, oid)?),
        }
    }
}

impl GitRepo for Git2Repo {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD")?;
        if head.is_branch() {
            head.shorthand()
                .map(String::from)
                .ok_or_else(|| anyhow!("Branch name is not valid UTF-8"))
        } else {
            // Detached HEAD - return short hash
            let oid = head.target().ok_or_else(|| anyhow!("HEAD has no target"))?;
            Ok(format!("{:.7}", oid))
        }
    }

    fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Repository has no working directory (bare repo?)"))
    }

    fn commits(&self, limit: usize, merge_base: Option<&str>) -> Result<Vec<Commit>> {
        let head = match self.repo.head() {
            Ok(head) => head.target().ok_or_else(|| anyhow!("No HEAD"))?,
            // Unborn branch: nothing committed yet
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to get HEAD"),
        };
        let merge_base = merge_base
            .filter(|hash| !hash.is_empty())
            .map(Oid::from_str)
            .transpose()
            .context("Invalid merge base hash")?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head)?;

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            let author = commit.author();
            let status = if self.is_merged(oid, merge_base)? {
                CommitStatus::Merged
            } else {
                CommitStatus::Unmerged
            };

            commits.push(Commit {
                hash: oid.to_string(),
                short_hash: format!("{:.7}", oid),
                message: commit.message().unwrap_or("").to_string(),
                author: author.name().unwrap_or("Unknown").to_string(),
                timestamp: commit.time().seconds(),
                status,
            });
        }

        Ok(commits)
    }

    fn file_changes(&self) -> Result<Vec<FileChange>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .exclude_submodules(true);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to read working tree status")?;

        let mut files: Vec<FileChange> = statuses
            .iter()
            .filter_map(|entry| {
                let path = entry.path()?.to_string();
                let status = change_status(entry.status())?;
                Some(FileChange { path, status })
            })
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(files)
    }
}

fn change_status(status: Status) -> Option<ChangeStatus> {
    if status.contains(Status::WT_NEW) && !status.intersects(index_flags()) {
        return Some(ChangeStatus::UNTRACKED);
    }

    let staged = if status.contains(Status::INDEX_NEW) {
        'A'
    } else if status.contains(Status::INDEX_MODIFIED) {
        'M'
    } else if status.contains(Status::INDEX_DELETED) {
        'D'
    } else if status.contains(Status::INDEX_RENAMED) {
        'R'
    } else if status.contains(Status::INDEX_TYPECHANGE) {
        'T'
    } else {
        ' '
    };

    let unstaged = if status.contains(Status::WT_MODIFIED) {
        'M'
    } else if status.contains(Status::WT_DELETED) {
        'D'
    } else if status.contains(Status::WT_RENAMED) {
        'R'
    } else if status.contains(Status::WT_TYPECHANGE) {
        'T'
    } else if status.contains(Status::CONFLICTED) {
        'U'
    } else {
        ' '
    };

    if staged == ' ' && unstaged == ' ' {
        None
    } else {
        Some(ChangeStatus { staged, unstaged })
    }
}

fn index_flags() -> Status {
    Status::INDEX_NEW
        | Status::INDEX_MODIFIED
        | Status::INDEX_DELETED
        | Status::INDEX_RENAMED
        | Status::INDEX_TYPECHANGE
}
