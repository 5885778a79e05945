pub mod diff_hunks;
pub mod fixup;
pub mod types;

pub use fixup::{FixupOutcome, FixupTarget};
pub use types::{ChangeStatus, Commit, CommitStatus, DeletedLineHunk, DiffSource, FileChange};
