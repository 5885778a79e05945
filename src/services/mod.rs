pub mod fan_out;
pub mod fixup;
pub mod main_branches;

#[cfg(test)]
pub mod fake;

pub use fixup::{FixupLocator, FixupNavigator};
pub use main_branches::MainBranches;
