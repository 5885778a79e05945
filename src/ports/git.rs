//! Git ports (traits).
//! The command gateway runs raw `git` argument vectors; the repository port
//! reads structured state (history window, working tree files).

use crate::domain::{Commit, FileChange};
use anyhow::Result;
use std::fmt;
use std::path::PathBuf;

/// Failure of a single git invocation.
#[derive(Debug)]
pub enum CommandError {
    /// git ran and exited with a non-zero status.
    Exited {
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },
    /// git could not be started at all.
    Spawn {
        args: Vec<String>,
        source: std::io::Error,
    },
}

impl CommandError {
    pub fn exited(args: &[&str], code: Option<i32>, stderr: impl Into<String>) -> Self {
        CommandError::Exited {
            args: args.iter().map(|a| a.to_string()).collect(),
            code,
            stderr: stderr.into(),
        }
    }

    pub fn spawn(args: &[&str], source: std::io::Error) -> Self {
        CommandError::Spawn {
            args: args.iter().map(|a| a.to_string()).collect(),
            source,
        }
    }

    /// True when git ran but reported failure (as opposed to not running).
    pub fn is_exit(&self) -> bool {
        matches!(self, CommandError::Exited { .. })
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Exited { args, code, stderr } => match code {
                Some(c) => write!(
                    f,
                    "git {} failed with exit code {}: {}",
                    args.join(" "),
                    c,
                    stderr.trim()
                ),
                None => write!(f, "git {} failed: {}", args.join(" "), stderr.trim()),
            },
            CommandError::Spawn { args, source } => {
                write!(f, "could not run git {}: {}", args.join(" "), source)
            }
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Spawn { source, .. } => Some(source),
            CommandError::Exited { .. } => None,
        }
    }
}

/// Port for running git commands.
/// Shared across scoped worker threads, hence `Send + Sync`.
pub trait CommandGateway: Send + Sync {
    /// Run `git <args>`, discarding stdout.
    fn run(&self, args: &[&str]) -> Result<(), CommandError>;

    /// Run `git <args>` and return its stdout.
    fn run_with_output(&self, args: &[&str]) -> Result<String, CommandError>;
}

/// Port for structured repository reads.
pub trait GitRepo {
    /// Current branch name, or a short hash when HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// Working directory, used as the cwd for the command gateway.
    fn workdir(&self) -> Result<PathBuf>;

    /// Up to `limit` commits reachable from HEAD, newest first.
    /// Commits that are ancestors of (or equal to) `merge_base` are merged.
    fn commits(&self, limit: usize, merge_base: Option<&str>) -> Result<Vec<Commit>>;

    /// Changed, staged and untracked files in the working tree.
    fn file_changes(&self) -> Result<Vec<FileChange>>;
}
