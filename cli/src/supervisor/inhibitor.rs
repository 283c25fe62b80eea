//! Discovery and spawning of the `caffeinate` subprocess.

use super::SupervisorError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::{Child, Command};
use tracing::debug;

pub const CAFFEINATE: &str = "caffeinate";

/// Prevent display sleep (`-d`) and system idle sleep (`-i`).
const CAPABILITY_FLAGS: [&str; 2] = ["-d", "-i"];

/// The sleep-inhibiting program and where to look for it.
#[derive(Debug, Clone)]
pub struct Inhibitor {
    program: String,
    search_path: Option<OsString>,
}

impl Inhibitor {
    pub fn caffeinate() -> Self {
        Self {
            program: CAFFEINATE.to_string(),
            search_path: None,
        }
    }

    /// Search `path` (a `PATH`-style list) instead of the process `PATH`.
    #[cfg(test)]
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn locate(&self) -> Result<PathBuf, SupervisorError> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(&self.program, Some(paths), cwd)
            }
            None => which::which(&self.program),
        };

        found.map_err(|e| {
            debug!(program = %self.program, error = %e, "Inhibitor lookup failed");
            SupervisorError::InhibitorNotFound(self.program.clone())
        })
    }

    /// Start the inhibitor at `path`. The child is killed if its handle is dropped.
    pub fn spawn(&self, path: &Path, seconds: Option<u64>) -> Result<Child, SupervisorError> {
        let args = inhibitor_args(seconds);
        debug!(path = %path.display(), ?args, "Spawning inhibitor");

        Command::new(path)
            .args(&args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SupervisorError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

pub fn inhibitor_args(seconds: Option<u64>) -> Vec<String> {
    let mut args: Vec<String> = CAPABILITY_FLAGS.iter().map(|f| f.to_string()).collect();
    if let Some(seconds) = seconds {
        args.push("-t".to_string());
        args.push(seconds.to_string());
    }
    args
}
