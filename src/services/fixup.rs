//! Finding the commit a pending change should be a fixup for.
//!
//! The lines the diff deletes are blamed against HEAD; if they all come from
//! one commit that is still in the history window and not yet merged, that
//! commit is the base.

use super::fan_out::fork_join;
use crate::domain::diff_hunks::parse_deleted_lines;
use crate::domain::fixup::{classify_hashes, locate_base_commit, BaseLookup, HashVerdict};
use crate::domain::{Commit, DeletedLineHunk, DiffSource, FixupOutcome, FixupTarget};
use crate::ports::CommandGateway;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

const DIFF_ARGS: [&str; 4] = ["-U0", "--ignore-submodules=all", "HEAD", "--"];

/// What the interactive layer does once a base commit has been found.
pub trait FixupNavigator {
    /// Reload the working tree state before anything reads it again.
    fn refresh_files(&mut self) -> Result<()>;

    /// Select the commit at `index` of the history window.
    fn select_commit(&mut self, index: usize);

    /// Switch to the commits view.
    fn show_commits(&mut self);
}

pub struct FixupLocator {
    gateway: Arc<dyn CommandGateway>,
}

impl FixupLocator {
    pub fn new(gateway: Arc<dyn CommandGateway>) -> Self {
        Self { gateway }
    }

    /// Work out the base commit for the current changes.
    ///
    /// `commits` is the history window, newest first. Only failures to read
    /// the diff or the commit subjects are errors; every other way of not
    /// finding a base is an outcome.
    pub fn find_base_commit(&self, commits: &[Commit]) -> Result<FixupOutcome> {
        let (diff, source) = self.get_diff()?;
        if diff.is_empty() {
            return Ok(FixupOutcome::NoChanges);
        }

        let parsed = parse_deleted_lines(&diff);
        if parsed.hunks.is_empty() {
            return Ok(FixupOutcome::NoDeletions);
        }

        let hashes = self.blame_deleted_lines(&parsed.hunks);

        let hash = match classify_hashes(&hashes) {
            HashVerdict::None => {
                tracing::error!(
                    "Blaming {} hunks with deleted lines found no commits",
                    parsed.hunks.len()
                );
                return Ok(FixupOutcome::NoBaseFound);
            }
            HashVerdict::Ambiguous(hashes) => {
                let subjects = self.commit_subjects(&hashes)?;
                return Ok(FixupOutcome::AmbiguousBase {
                    hashes,
                    subjects,
                    source,
                });
            }
            HashVerdict::Single(hash) => hash,
        };

        Ok(match locate_base_commit(&hash, commits) {
            BaseLookup::Found(index) => FixupOutcome::Resolved(FixupTarget {
                index,
                hash,
                source,
                needs_confirmation: parsed.has_only_added_hunks,
            }),
            BaseLookup::AlreadyMerged => FixupOutcome::AlreadyMerged,
            BaseLookup::OutOfWindow => FixupOutcome::OutOfWindow,
        })
    }

    /// Navigate to a resolved base commit, staging everything first when the
    /// change set came from the unstaged diff.
    pub fn apply(&self, target: &FixupTarget, navigator: &mut dyn FixupNavigator) -> Result<()> {
        if target.source == DiffSource::Unstaged {
            self.gateway
                .run(&["add", "-A"])
                .context("Failed to stage all changes")?;
            navigator.refresh_files()?;
        }

        navigator.select_commit(target.index);
        navigator.show_commits();
        Ok(())
    }

    /// Staged diff against HEAD, or the unstaged one if nothing is staged.
    fn get_diff(&self) -> Result<(String, DiffSource)> {
        let staged = self
            .diff_index(true)
            .context("Failed to read staged changes")?;
        if !staged.is_empty() {
            return Ok((staged, DiffSource::Staged));
        }

        let unstaged = self
            .diff_index(false)
            .context("Failed to read unstaged changes")?;
        Ok((unstaged, DiffSource::Unstaged))
    }

    fn diff_index(&self, cached: bool) -> Result<String> {
        let mut args = vec!["diff-index", "--no-ext-diff", "--no-color", "--patch"];
        if cached {
            args.push("--cached");
        }
        args.extend(DIFF_ARGS);
        Ok(self.gateway.run_with_output(&args)?)
    }

    /// Distinct hashes of the commits that introduced the deleted lines.
    ///
    /// A hunk whose blame fails (renamed or deleted file, say) is logged and
    /// contributes nothing; it never stops the other hunks.
    pub fn blame_deleted_lines(&self, hunks: &[DeletedLineHunk]) -> BTreeSet<String> {
        fork_join(hunks, |hunk| self.blame_hunk(hunk))
            .into_iter()
            .flatten()
            .flatten()
            .collect()
    }

    fn blame_hunk(&self, hunk: &DeletedLineHunk) -> Vec<String> {
        let range = format!("{},+{}", hunk.start_line, hunk.deleted_lines);
        let args = [
            "blame",
            "-l",
            "-L",
            range.as_str(),
            "HEAD",
            "--",
            hunk.filename.as_str(),
        ];

        match self.gateway.run_with_output(&args) {
            Ok(output) => output
                .lines()
                .filter_map(|line| line.split_whitespace().next())
                .map(String::from)
                .collect(),
            Err(err) => {
                tracing::error!("Error blaming file '{}': {}", hunk.filename, err);
                Vec::new()
            }
        }
    }

    fn commit_subjects(&self, hashes: &[String]) -> Result<String> {
        let mut args = vec!["show", "--no-patch", "--pretty=format:%h %s"];
        args.extend(hashes.iter().map(String::as_str));
        self.gateway
            .run_with_output(&args)
            .context("Failed to read commit subjects")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CommitStatus;
    use crate::services::fake::FakeGateway;
    use pretty_assertions::assert_eq;

    const STAGED: [&str; 9] = [
        "diff-index",
        "--no-ext-diff",
        "--no-color",
        "--patch",
        "--cached",
        "-U0",
        "--ignore-submodules=all",
        "HEAD",
        "--",
    ];
    const UNSTAGED: [&str; 8] = [
        "diff-index",
        "--no-ext-diff",
        "--no-color",
        "--patch",
        "-U0",
        "--ignore-submodules=all",
        "HEAD",
        "--",
    ];

    const TWO_FILE_DIFF: &str = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -3,2 +3 @@
-one
-two
+three
diff --git a/b.rs b/b.rs
--- a/b.rs
+++ b/b.rs
@@ -10 +10 @@
-four
+five
";

    const ADDITIONS_ONLY_DIFF: &str = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -3,0 +4,2 @@
+one
+two
";

    const MIXED_DIFF: &str = "\
diff --git a/a.rs b/a.rs
--- a/a.rs
+++ b/a.rs
@@ -3,2 +3 @@
-one
-two
+three
@@ -8,0 +8 @@
+added
";

    fn blame_a() -> [&'static str; 7] {
        ["blame", "-l", "-L", "3,+2", "HEAD", "--", "a.rs"]
    }

    fn blame_b() -> [&'static str; 7] {
        ["blame", "-l", "-L", "10,+1", "HEAD", "--", "b.rs"]
    }

    fn commit(hash: &str, status: CommitStatus) -> Commit {
        Commit {
            hash: hash.to_string(),
            short_hash: hash.chars().take(7).collect(),
            message: format!("commit {}", hash),
            author: "Test".to_string(),
            timestamp: 0,
            status,
        }
    }

    fn history() -> Vec<Commit> {
        vec![
            commit("h0", CommitStatus::Unmerged),
            commit("h1", CommitStatus::Unmerged),
            commit("h2", CommitStatus::Unmerged),
            commit("h3", CommitStatus::Unmerged),
            commit("h4", CommitStatus::Merged),
        ]
    }

    fn fixture(gateway: FakeGateway) -> (FixupLocator, Arc<FakeGateway>) {
        let gateway = Arc::new(gateway);
        (FixupLocator::new(gateway.clone()), gateway)
    }

    #[derive(Default)]
    struct RecordingNavigator {
        events: Vec<String>,
    }

    impl FixupNavigator for RecordingNavigator {
        fn refresh_files(&mut self) -> Result<()> {
            self.events.push("refresh".to_string());
            Ok(())
        }

        fn select_commit(&mut self, index: usize) {
            self.events.push(format!("select {}", index));
        }

        fn show_commits(&mut self) {
            self.events.push("show commits".to_string());
        }
    }

    #[test]
    fn empty_diff_is_no_changes() {
        let (locator, gateway) = fixture(FakeGateway::new().on(&STAGED, "").on(&UNSTAGED, ""));

        assert_eq!(locator.find_base_commit(&history()).unwrap(), FixupOutcome::NoChanges);
        assert_eq!(gateway.calls().len(), 2);
    }

    #[test]
    fn additions_only_is_no_deletions() {
        let (locator, _) = fixture(FakeGateway::new().on(&STAGED, ADDITIONS_ONLY_DIFF));

        assert_eq!(locator.find_base_commit(&history()).unwrap(), FixupOutcome::NoDeletions);
    }

    #[test]
    fn staged_failure_propagates_without_fallback() {
        let (locator, gateway) =
            fixture(FakeGateway::new().fail(&STAGED).on(&UNSTAGED, TWO_FILE_DIFF));

        assert!(locator.find_base_commit(&history()).is_err());
        assert_eq!(gateway.call_count(&UNSTAGED), 0);
    }

    #[test]
    fn single_unmerged_commit_resolves_to_its_index() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "h3 (Alice 2024-01-01 3) one\nh3 (Alice 2024-01-01 4) two\n")
                .on(&blame_b(), "h3 (Alice 2024-01-01 10) four\n"),
        );

        assert_eq!(
            locator.find_base_commit(&history()).unwrap(),
            FixupOutcome::Resolved(FixupTarget {
                index: 3,
                hash: "h3".to_string(),
                source: DiffSource::Staged,
                needs_confirmation: false,
            })
        );
    }

    #[test]
    fn unstaged_fallback_is_recorded_in_target() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, "")
                .on(&UNSTAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "h1 1) one\nh1 2) two\n")
                .on(&blame_b(), "h1 3) four\n"),
        );

        match locator.find_base_commit(&history()).unwrap() {
            FixupOutcome::Resolved(target) => {
                assert_eq!(target.index, 1);
                assert_eq!(target.source, DiffSource::Unstaged);
            }
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn only_added_hunks_require_confirmation() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, MIXED_DIFF)
                .on(&blame_a(), "h2 1) one\nh2 2) two\n"),
        );

        match locator.find_base_commit(&history()).unwrap() {
            FixupOutcome::Resolved(target) => assert!(target.needs_confirmation),
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn multiple_commits_are_ambiguous_with_subjects() {
        let subjects_args = ["show", "--no-patch", "--pretty=format:%h %s", "h1", "h2"];
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "h2 1) one\nh1 2) two\n")
                .on(&blame_b(), "h2 3) four\n")
                .on(&subjects_args, "h1 First\nh2 Second"),
        );

        assert_eq!(
            locator.find_base_commit(&history()).unwrap(),
            FixupOutcome::AmbiguousBase {
                hashes: vec!["h1".to_string(), "h2".to_string()],
                subjects: "h1 First\nh2 Second".to_string(),
                source: DiffSource::Staged,
            }
        );
    }

    #[test]
    fn subject_failure_propagates() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "h2 1) one\n")
                .on(&blame_b(), "h1 3) four\n"),
        );

        assert!(locator.find_base_commit(&history()).is_err());
    }

    #[test]
    fn failing_blame_keeps_other_hunks() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .fail(&blame_a())
                .on(&blame_b(), "h2 3) four\n"),
        );

        match locator.find_base_commit(&history()).unwrap() {
            FixupOutcome::Resolved(target) => assert_eq!(target.hash, "h2"),
            other => panic!("expected Resolved, got {:?}", other),
        }
    }

    #[test]
    fn all_blames_failing_is_no_base_found() {
        let (locator, _) = fixture(FakeGateway::new().on(&STAGED, TWO_FILE_DIFF));

        assert_eq!(locator.find_base_commit(&history()).unwrap(), FixupOutcome::NoBaseFound);
    }

    #[test]
    fn merged_commit_is_already_merged() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "h4 1) one\n")
                .on(&blame_b(), "h4 3) four\n"),
        );

        assert_eq!(locator.find_base_commit(&history()).unwrap(), FixupOutcome::AlreadyMerged);
    }

    #[test]
    fn unknown_commit_depends_on_oldest_visible_commit() {
        let gateway = || {
            FakeGateway::new()
                .on(&STAGED, TWO_FILE_DIFF)
                .on(&blame_a(), "ffff 1) one\n")
                .on(&blame_b(), "ffff 3) four\n")
        };

        let (merged_window, _) = fixture(gateway());
        assert_eq!(
            merged_window.find_base_commit(&history()).unwrap(),
            FixupOutcome::AlreadyMerged
        );

        let mut short_history = history();
        short_history.pop();
        let (short_window, _) = fixture(gateway());
        assert_eq!(
            short_window.find_base_commit(&short_history).unwrap(),
            FixupOutcome::OutOfWindow
        );
    }

    #[test]
    fn blame_is_independent_of_hunk_order() {
        let (locator, _) = fixture(
            FakeGateway::new()
                .on(&blame_a(), "h1 1) one\nh2 2) two\n")
                .on(&blame_b(), "h3 3) four\n"),
        );
        let a = DeletedLineHunk {
            filename: "a.rs".to_string(),
            start_line: 3,
            deleted_lines: 2,
        };
        let b = DeletedLineHunk {
            filename: "b.rs".to_string(),
            start_line: 10,
            deleted_lines: 1,
        };

        let forward = locator.blame_deleted_lines(&[a.clone(), b.clone()]);
        let backward = locator.blame_deleted_lines(&[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 3);
    }

    #[test]
    fn apply_staged_target_navigates_without_staging() {
        let (locator, gateway) = fixture(FakeGateway::new());
        let mut navigator = RecordingNavigator::default();
        let target = FixupTarget {
            index: 3,
            hash: "h3".to_string(),
            source: DiffSource::Staged,
            needs_confirmation: false,
        };

        locator.apply(&target, &mut navigator).unwrap();

        assert_eq!(navigator.events, vec!["select 3", "show commits"]);
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn apply_unstaged_target_stages_and_refreshes_first() {
        let (locator, gateway) = fixture(FakeGateway::new().on(&["add", "-A"], ""));
        let mut navigator = RecordingNavigator::default();
        let target = FixupTarget {
            index: 3,
            hash: "h3".to_string(),
            source: DiffSource::Unstaged,
            needs_confirmation: false,
        };

        locator.apply(&target, &mut navigator).unwrap();

        assert_eq!(navigator.events, vec!["refresh", "select 3", "show commits"]);
        assert_eq!(gateway.call_count(&["add", "-A"]), 1);
    }

    #[test]
    fn apply_stops_when_staging_fails() {
        let (locator, _) = fixture(FakeGateway::new().fail(&["add", "-A"]));
        let mut navigator = RecordingNavigator::default();
        let target = FixupTarget {
            index: 0,
            hash: "h0".to_string(),
            source: DiffSource::Unstaged,
            needs_confirmation: false,
        };

        assert!(locator.apply(&target, &mut navigator).is_err());
        assert!(navigator.events.is_empty());
    }
}
