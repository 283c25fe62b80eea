//! Shutdown signal listener.
//!
//! Handlers are registered when [`ShutdownSignal::install`] is called, not
//! when the first `recv` is polled, so a signal arriving in between is queued
//! instead of killing the process.

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

#[cfg(unix)]
pub struct ShutdownSignal {
    interrupt: Option<Signal>,
    terminate: Option<Signal>,
    hangup: Option<Signal>,
}

#[cfg(unix)]
impl ShutdownSignal {
    pub fn install() -> Self {
        Self {
            interrupt: listen(SignalKind::interrupt(), "SIGINT"),
            terminate: listen(SignalKind::terminate(), "SIGTERM"),
            hangup: listen(SignalKind::hangup(), "SIGHUP"),
        }
    }

    /// Wait for SIGINT, SIGTERM or SIGHUP and return its name.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = next(&mut self.interrupt) => "SIGINT",
            _ = next(&mut self.terminate) => "SIGTERM",
            _ = next(&mut self.hangup) => "SIGHUP",
        }
    }
}

#[cfg(unix)]
fn listen(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(sig) => Some(sig),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install {} handler", name);
            None
        }
    }
}

#[cfg(unix)]
async fn next(sig: &mut Option<Signal>) {
    match sig {
        Some(sig) => {
            sig.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

#[cfg(not(unix))]
pub struct ShutdownSignal;

#[cfg(not(unix))]
impl ShutdownSignal {
    pub fn install() -> Self {
        Self
    }

    pub async fn recv(&mut self) -> &'static str {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}
