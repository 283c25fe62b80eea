//! Supervision of the sleep inhibitor.
//!
//! A run goes through these steps:
//! 1. Relaunches itself in the background if asked to (and stops there)
//! 2. Locates `caffeinate` on the search path
//! 3. Installs shutdown signal handlers
//! 4. Spawns `caffeinate -d -i [-t <seconds>]`
//! 5. Waits for whichever comes first: the inhibitor exiting on its own
//!    (only when a duration was given) or a shutdown signal, which kills it
//!
//! Both paths leave the inhibitor reaped before [`Supervisor::run`] returns.

mod background;
mod inhibitor;
mod signal;

use inhibitor::Inhibitor;

use crate::config::RunConfig;
use crate::utils::console::Console;
use signal::ShutdownSignal;
use tokio::process::Child;
use tracing::debug;

/// Errors that end a run with a non-zero exit status.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("{0} command not found. This tool requires macOS.")]
    InhibitorNotFound(String),

    #[error("Error getting executable path: {0}")]
    ExecutablePath(#[source] std::io::Error),

    #[error("Failed to start background process: {0}")]
    BackgroundLaunch(#[source] std::io::Error),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A background copy was started; this process has nothing left to do.
    Detached { pid: u32 },
    /// The inhibitor's own timer ran out.
    DurationElapsed,
    /// A shutdown signal arrived and the inhibitor was stopped.
    Interrupted,
}

pub struct Supervisor {
    config: RunConfig,
    inhibitor: Inhibitor,
    console: Console,
}

impl Supervisor {
    pub fn new(config: RunConfig, console: Console) -> Self {
        Self {
            config,
            inhibitor: Inhibitor::caffeinate(),
            console,
        }
    }

    #[cfg(test)]
    pub fn with_inhibitor(mut self, inhibitor: Inhibitor) -> Self {
        self.inhibitor = inhibitor;
        self
    }

    /// Run to completion. Fatal errors are reported on the console before
    /// being returned.
    pub async fn run(mut self) -> Result<Outcome, SupervisorError> {
        match self.supervise().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.console.error(&e);
                Err(e)
            }
        }
    }

    async fn supervise(&mut self) -> Result<Outcome, SupervisorError> {
        if self.config.should_relaunch() {
            debug!("Starting background mode");
            let pid = background::relaunch(&self.config)?;
            self.report_detached(pid);
            return Ok(Outcome::Detached { pid });
        }

        let path = self.inhibitor.locate()?;
        debug!(path = %path.display(), "Found {}", self.inhibitor.program());
        self.console.info("Starting awake - preventing sleep on your Mac");

        let shutdown = ShutdownSignal::install();
        let child = self.inhibitor.spawn(&path, self.config.inhibitor_seconds())?;

        match self.config.duration {
            Some(duration) => self.console.info(format_args!(
                "Mac will stay awake for {}",
                humantime::format_duration(duration)
            )),
            None => self.console.info("Mac will stay awake until you press Ctrl+C"),
        }

        Ok(self.wait(child, shutdown).await)
    }

    /// Race the inhibitor's own exit (bounded runs only) against a shutdown signal.
    async fn wait(&mut self, mut child: Child, mut shutdown: ShutdownSignal) -> Outcome {
        let bounded = self.config.duration.is_some();
        if bounded {
            debug!(pid = ?child.id(), "Waiting for {} to complete", self.inhibitor.program());
        }

        tokio::select! {
            status = child.wait(), if bounded => {
                match status {
                    Ok(status) if !status.success() => {
                        debug!(%status, "{} process ended", self.inhibitor.program());
                    }
                    Err(e) => {
                        debug!(error = %e, "{} process ended", self.inhibitor.program());
                    }
                    Ok(_) => {}
                }
                self.console.info("Duration completed, exiting");
                Outcome::DurationElapsed
            }
            name = shutdown.recv() => {
                debug!(signal = name, "Received shutdown signal");
                match child.kill().await {
                    Ok(()) => self.console.info(format_args!(
                        "Stopped {} - Mac can sleep normally now",
                        self.inhibitor.program()
                    )),
                    Err(e) => self.console.error(format_args!(
                        "Failed to stop {}: {}",
                        self.inhibitor.program(),
                        e
                    )),
                }
                Outcome::Interrupted
            }
        }
    }

    fn report_detached(&mut self, pid: u32) {
        self.console.info(format_args!(
            "Awake is now running in the background (PID: {})",
            pid
        ));
        match self.config.duration {
            Some(duration) => {
                self.console.info(format_args!(
                    "Mac will stay awake for {}",
                    humantime::format_duration(duration)
                ));
                self.console.info("Use 'pkill awake' to stop it early if needed");
            }
            None => self.console.info("Mac will stay awake until you run 'pkill awake'"),
        }
    }
}
