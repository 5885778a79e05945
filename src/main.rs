//! fixbase - find the commit your changes belong to
//!
//! A TUI over a feature branch that blames the lines your pending changes
//! delete and jumps to the single unmerged commit they came from.

mod adapters;
mod app;
mod config;
mod domain;
mod logging;
mod ports;
mod services;
mod session;
mod ui;

use adapters::{CrosstermTerminal, Git2Repo, GitCli};
use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};
use ports::GitRepo;
use session::Session;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "fixbase")]
#[command(about = "Find the base commit for a fixup of your current changes")]
#[command(version)]
struct Args {
    /// Path to git repository (default: current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Main branch name to probe; repeat to set several, in priority order
    #[arg(short = 'm', long = "main-branch")]
    main_branch: Vec<String>,

    /// Config file (default: config.toml in the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if !args.main_branch.is_empty() {
        config.main_branches = args.main_branch;
    }

    match logging::init(&config.log_filter) {
        Ok(path) => tracing::info!("Logging to {}", path.display()),
        Err(e) => eprintln!("Warning: Could not initialize logging: {:#}", e),
    }

    let git = match &args.path {
        Some(path) => Git2Repo::open(path),
        None => Git2Repo::open_current_dir(),
    }
    .context("Failed to open git repository. Are you in a git directory?")?;

    let workdir = git.workdir()?;
    tracing::info!("Opened repository at {}", workdir.display());
    let session = Session::new(config, Arc::new(GitCli::new(&workdir)));

    let mut terminal = CrosstermTerminal::new().context("Failed to initialize terminal")?;
    let mut app = app::App::new(&git, session).context("Failed to initialize app")?;

    // Terminal cleanup happens in Drop
    app.run(&mut terminal, &git)
}
