//! Signal-driven shutdown for long-running store clients.

use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Shutdown coordinator shared by the reaper and worker poll loops.
///
/// Holds a `CancellationToken` that fires once ctrl-c or SIGTERM is seen.
/// Each subsystem takes a [`token`](Shutdown::token) clone and drains when
/// it cancels; [`trigger`](Shutdown::trigger) fires it without a signal,
/// for tests and administrative stops.
#[derive(Clone, Debug, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the signal watcher. The first signal wins; calling this more
    /// than once is harmless.
    pub fn listen_for_signals(&self) {
        let token = self.token.clone();
        tokio::spawn(async move {
            let terminated = async {
                match signal(SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(err) => {
                        // Without a SIGTERM handler ctrl-c still works;
                        // park this branch instead of firing it.
                        tracing::error!(error = %err, "Could not watch SIGTERM");
                        std::future::pending::<()>().await;
                    }
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, draining");
                }
                _ = terminated => {
                    tracing::info!("SIGTERM received, draining");
                }
            }
            token.cancel();
        });
    }

    /// Fire the token directly, bypassing signals.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    /// A token clone for a subsystem to select on.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
