//! Detaching by relaunching the current executable.
//!
//! The copy runs with [`BACKGROUND_ENV`] set so it never relaunches again,
//! with every standard stream closed, and in its own process group so that
//! Ctrl+C or a closing terminal session does not reach it.

use super::SupervisorError;
use crate::config::{BACKGROUND_ENV, RunConfig};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Relaunch this executable in the background and return the child's PID.
pub fn relaunch(config: &RunConfig) -> Result<u32, SupervisorError> {
    let executable = std::env::current_exe().map_err(SupervisorError::ExecutablePath)?;
    relaunch_with(&executable, config)
}

pub fn relaunch_with(executable: &Path, config: &RunConfig) -> Result<u32, SupervisorError> {
    let args = config.relaunch_args();
    debug!(executable = %executable.display(), ?args, "Spawning background process");

    let mut cmd = Command::new(executable);
    cmd.args(&args)
        .env(BACKGROUND_ENV, "1")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    // The parent exits right after this, leaving the child to init.
    #[allow(clippy::zombie_processes)]
    let child = cmd.spawn().map_err(SupervisorError::BackgroundLaunch)?;
    Ok(child.id())
}
