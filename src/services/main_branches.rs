//! Resolution of the configured main branches to refs that actually exist.
//!
//! The result is computed once per session and reused for every merge-base
//! query. Deleted or newly created main branches are only picked up after a
//! restart.

use super::fan_out::fork_join;
use crate::ports::{CommandError, CommandGateway};
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of a single ref probe.
#[derive(Debug)]
pub enum RefProbe {
    Exists(String),
    /// git ran and reported that the ref does not exist.
    Missing,
    /// git could not be run at all.
    Failed(CommandError),
}

impl RefProbe {
    fn from_output(result: Result<String, CommandError>) -> Self {
        match result {
            Ok(output) => RefProbe::Exists(output.trim().to_string()),
            Err(err) if err.is_exit() => RefProbe::Missing,
            Err(err) => RefProbe::Failed(err),
        }
    }

    fn from_status(result: Result<(), CommandError>, ref_name: String) -> Self {
        match result {
            Ok(()) => RefProbe::Exists(ref_name),
            Err(err) if err.is_exit() => RefProbe::Missing,
            Err(err) => RefProbe::Failed(err),
        }
    }
}

/// Which ref form a configured main branch resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainBranchResolution {
    /// The upstream of the local branch, as printed by git.
    Upstream(String),
    /// `refs/remotes/origin/<name>`.
    Remote(String),
    /// `refs/heads/<name>`.
    Local(String),
    Unresolved,
}

impl MainBranchResolution {
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            MainBranchResolution::Upstream(r)
            | MainBranchResolution::Remote(r)
            | MainBranchResolution::Local(r) => Some(r),
            MainBranchResolution::Unresolved => None,
        }
    }
}

/// A configured main branch name and what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainBranchCandidate {
    pub name: String,
    pub resolution: MainBranchResolution,
}

/// Session-owned, memoized set of existing main branch refs.
pub struct MainBranches {
    configured: Vec<String>,
    gateway: Arc<dyn CommandGateway>,
    existing: Mutex<Option<Vec<String>>>,
}

impl MainBranches {
    pub fn new(configured: Vec<String>, gateway: Arc<dyn CommandGateway>) -> Self {
        Self {
            configured,
            gateway,
            existing: Mutex::new(None),
        }
    }

    /// Existing main branch refs, in configured order.
    ///
    /// The first caller computes the list while holding the lock; concurrent
    /// callers wait and then read the cached value.
    pub fn get(&self) -> Vec<String> {
        let mut existing = self
            .existing
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        existing
            .get_or_insert_with(|| self.determine_main_branches())
            .clone()
    }

    /// Merge base of `ref_name` with the closest main branch, or "" if there
    /// is none.
    pub fn merge_base(&self, ref_name: &str) -> String {
        let main_branches = self.get();
        if main_branches.is_empty() {
            return String::new();
        }

        // git picks the best common ancestor across all of them. A failure
        // means either no shared history or a main branch deleted since it
        // was resolved; neither is worth surfacing.
        let mut args = vec!["merge-base", ref_name];
        args.extend(main_branches.iter().map(String::as_str));

        match self.gateway.run_with_output(&args) {
            Ok(output) => ignoring_warnings(&output),
            Err(err) => {
                tracing::debug!("No merge base for {}: {}", ref_name, err);
                String::new()
            }
        }
    }

    /// Resolve a single configured name, stopping at the first probe that
    /// succeeds.
    pub fn resolve_candidate(&self, name: &str) -> MainBranchCandidate {
        let remote = || self.probe_ref(format!("refs/remotes/origin/{}", name));
        let local = || self.probe_ref(format!("refs/heads/{}", name));

        let resolution = if let Some(r) = accept(name, self.probe_upstream(name)) {
            MainBranchResolution::Upstream(r)
        } else if let Some(r) = accept(name, remote()) {
            // No local branch, or one without an upstream
            MainBranchResolution::Remote(r)
        } else if let Some(r) = accept(name, local()) {
            // Repositories that are never pushed anywhere
            MainBranchResolution::Local(r)
        } else {
            tracing::debug!("Main branch {} does not exist", name);
            MainBranchResolution::Unresolved
        };

        MainBranchCandidate {
            name: name.to_string(),
            resolution,
        }
    }

    fn probe_upstream(&self, name: &str) -> RefProbe {
        let upstream = format!("{}@{{u}}", name);
        RefProbe::from_output(self.gateway.run_with_output(&[
            "rev-parse",
            "--symbolic-full-name",
            &upstream,
        ]))
    }

    fn probe_ref(&self, ref_name: String) -> RefProbe {
        let result = self.gateway.run(&["rev-parse", "--verify", "--quiet", &ref_name]);
        RefProbe::from_status(result, ref_name)
    }

    fn determine_main_branches(&self) -> Vec<String> {
        let candidates = fork_join(&self.configured, |name| self.resolve_candidate(name));
        let resolved: Vec<String> = candidates
            .into_iter()
            .flatten()
            .filter_map(|candidate| candidate.resolution.ref_name().map(String::from))
            .filter(|ref_name| !ref_name.is_empty())
            .collect();

        tracing::info!("Existing main branches: {:?}", resolved);
        resolved
    }
}

fn accept(name: &str, probe: RefProbe) -> Option<String> {
    match probe {
        RefProbe::Exists(ref_name) => Some(ref_name),
        RefProbe::Missing => None,
        RefProbe::Failed(err) => {
            tracing::warn!("Probing main branch {} failed: {}", name, err);
            None
        }
    }
}

/// Keep only the last line of trimmed git output; git may print a warning
/// (e.g. about an ambiguous refname) before the actual result.
pub fn ignoring_warnings(output: &str) -> String {
    output.trim().lines().last().unwrap_or("").to_string()
}
