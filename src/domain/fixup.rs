//! Decision logic for locating the base commit of a fixup.
//! No I/O - the blamed hashes and the history window come in, a verdict goes out.

use super::types::{Commit, DiffSource};
use std::collections::BTreeSet;

pub const NO_CHANGED_FILES: &str = "No changed files.";
pub const NO_DELETED_LINES: &str =
    "No deleted lines in the diff. Only changes that delete or modify existing lines can be attributed to a base commit.";
pub const NO_BASE_COMMITS_FOUND: &str = "No base commits found.";
pub const MULTIPLE_BASE_COMMITS_STAGED: &str =
    "The staged changes touch lines from more than one commit. Stage only the changes that belong to a single commit and try again:";
pub const MULTIPLE_BASE_COMMITS_UNSTAGED: &str =
    "The changes touch lines from more than one commit. Stage the changes that belong to a single commit and try again:";
pub const BASE_COMMIT_ALREADY_MERGED: &str =
    "The base commit for this change is already on the main branch.";
pub const BASE_COMMIT_NOT_IN_VIEW: &str =
    "The base commit for this change is not in the current commit list.";
pub const FIND_BASE_COMMIT_TITLE: &str = "Find base commit for fixup";
pub const ONLY_ADDED_LINES_WARNING: &str =
    "Some hunks in the diff only add lines, so they could not be attributed to a commit. Make sure they belong in the commit that was found. Continue?";

/// Where a resolved fixup points, and what has to happen before navigating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupTarget {
    /// Position in the commit history window.
    pub index: usize,
    pub hash: String,
    pub source: DiffSource,
    /// Set when the diff also had hunks that only added lines.
    pub needs_confirmation: bool,
}

/// The single verdict of one find-base-commit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixupOutcome {
    NoChanges,
    NoDeletions,
    NoBaseFound,
    AmbiguousBase {
        hashes: Vec<String>,
        subjects: String,
        source: DiffSource,
    },
    AlreadyMerged,
    OutOfWindow,
    Resolved(FixupTarget),
}

impl FixupOutcome {
    /// Text shown to the user for every outcome except `Resolved`.
    pub fn message(&self) -> Option<String> {
        match self {
            FixupOutcome::NoChanges => Some(NO_CHANGED_FILES.to_string()),
            FixupOutcome::NoDeletions => Some(NO_DELETED_LINES.to_string()),
            FixupOutcome::NoBaseFound => Some(NO_BASE_COMMITS_FOUND.to_string()),
            FixupOutcome::AmbiguousBase {
                subjects, source, ..
            } => {
                let lead = match source {
                    DiffSource::Staged => MULTIPLE_BASE_COMMITS_STAGED,
                    DiffSource::Unstaged => MULTIPLE_BASE_COMMITS_UNSTAGED,
                };
                Some(format!("{}\n\n{}", lead, subjects.trim_end()))
            }
            FixupOutcome::AlreadyMerged => Some(BASE_COMMIT_ALREADY_MERGED.to_string()),
            FixupOutcome::OutOfWindow => Some(BASE_COMMIT_NOT_IN_VIEW.to_string()),
            FixupOutcome::Resolved(_) => None,
        }
    }

    /// True for the outcomes that indicate something went wrong internally.
    pub fn is_error(&self) -> bool {
        matches!(self, FixupOutcome::NoBaseFound)
    }
}

/// Where a single blamed hash sits relative to the history window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseLookup {
    Found(usize),
    AlreadyMerged,
    OutOfWindow,
}

/// Look a hash up in the history window.
///
/// A hash missing from the window is assumed to be merged when the oldest
/// visible commit is merged: the window is bounded, so the commit most likely
/// sits further down the main branch.
pub fn locate_base_commit(hash: &str, commits: &[Commit]) -> BaseLookup {
    match commits.iter().position(|c| c.hash == hash) {
        Some(index) if commits[index].is_merged() => BaseLookup::AlreadyMerged,
        Some(index) => BaseLookup::Found(index),
        None => match commits.last() {
            Some(oldest) if oldest.is_merged() => BaseLookup::AlreadyMerged,
            _ => BaseLookup::OutOfWindow,
        },
    }
}

/// What to do with a set of blamed hashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashVerdict {
    None,
    Ambiguous(Vec<String>),
    Single(String),
}

pub fn classify_hashes(hashes: &BTreeSet<String>) -> HashVerdict {
    let mut iter = hashes.iter();
    match (iter.next(), iter.next()) {
        (None, _) => HashVerdict::None,
        (Some(hash), None) => HashVerdict::Single(hash.clone()),
        _ => HashVerdict::Ambiguous(hashes.iter().cloned().collect()),
    }
}
