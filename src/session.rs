//! Per-run context shared by the interactive layer.

use crate::config::Config;
use crate::ports::CommandGateway;
use crate::services::{FixupLocator, MainBranches};
use std::sync::Arc;

/// Owns everything that lives for the duration of one run, including the
/// memoized main branches.
pub struct Session {
    pub config: Config,
    gateway: Arc<dyn CommandGateway>,
    main_branches: MainBranches,
}

impl Session {
    pub fn new(config: Config, gateway: Arc<dyn CommandGateway>) -> Self {
        let main_branches = MainBranches::new(config.main_branches.clone(), gateway.clone());
        Self {
            config,
            gateway,
            main_branches,
        }
    }

    pub fn main_branches(&self) -> &MainBranches {
        &self.main_branches
    }

    pub fn fixup_locator(&self) -> FixupLocator {
        FixupLocator::new(self.gateway.clone())
    }
}
