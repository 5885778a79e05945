pub mod crossterm_adapter;
pub mod git2_adapter;
pub mod git_cli;

pub use crossterm_adapter::CrosstermTerminal;
pub use git2_adapter::Git2Repo;
pub use git_cli::GitCli;
