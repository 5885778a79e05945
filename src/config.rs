//! User configuration, read from `config.toml` in the user's config directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_LIMIT: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Branch names probed, in priority order, as main branches.
    pub main_branches: Vec<String>,
    /// Number of commits loaded into the commits view.
    pub history_limit: usize,
    /// `tracing` filter directive used when `FIXBASE_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            main_branches: vec!["master".to_string(), "main".to_string()],
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    main_branches: Option<Vec<String>>,
    #[serde(default)]
    history_limit: Option<usize>,
    #[serde(default)]
    log_filter: Option<String>,
}

impl Config {
    /// Default location: `<config dir>/fixbase/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fixbase").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(PathBuf::from).or_else(Self::default_path) {
            Some(path) => path,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let file: FileConfig = toml::from_str(text)?;
        let defaults = Self::default();

        let main_branches = file
            .main_branches
            .map(|names| {
                names
                    .into_iter()
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.main_branches);

        Ok(Self {
            main_branches,
            history_limit: file
                .history_limit
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.history_limit),
            log_filter: file.log_filter.unwrap_or(defaults.log_filter),
        })
    }
}
