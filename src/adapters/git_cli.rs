//! Command gateway that shells out to the `git` binary.

use crate::ports::{CommandError, CommandGateway};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    pub fn new(workdir: &Path) -> Self {
        Self {
            workdir: workdir.to_path_buf(),
        }
    }

    fn exec(&self, args: &[&str], capture_stdout: bool) -> Result<Output, CommandError> {
        tracing::debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .stdout(if capture_stdout {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| CommandError::spawn(args, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            tracing::trace!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            );
            return Err(CommandError::exited(args, output.status.code(), stderr));
        }

        Ok(output)
    }
}

impl CommandGateway for GitCli {
    fn run(&self, args: &[&str]) -> Result<(), CommandError> {
        self.exec(args, false).map(|_| ())
    }

    fn run_with_output(&self, args: &[&str]) -> Result<String, CommandError> {
        let output = self.exec(args, true)?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
