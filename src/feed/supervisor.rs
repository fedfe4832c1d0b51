//! Keeps the feed alive across connection failures.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use super::stop_requested;
use crate::Result;

/// Default pause between a failed session and the next attempt.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Restarts feed sessions with a fixed backoff until shutdown.
#[derive(Debug, Clone)]
pub struct ReconnectSupervisor {
    backoff: Duration,
}

impl Default for ReconnectSupervisor {
    fn default() -> Self {
        Self::new(DEFAULT_BACKOFF)
    }
}

impl ReconnectSupervisor {
    #[must_use]
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }

    #[must_use]
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Runs sessions produced by `session` until shutdown.
    ///
    /// `session` is called with the 1-based attempt number and must start
    /// a fresh connection each time. A session that returns `Ok(())` was
    /// stopped by shutdown, which ends supervision. A session error is
    /// logged and followed by the backoff delay, except that a fatal error
    /// (see [`TickerError::is_fatal`](crate::TickerError::is_fatal)) on the
    /// very first attempt is returned instead of retried.
    ///
    /// # Errors
    ///
    /// Returns the first attempt's error if it is fatal.
    pub async fn run_forever<F, Fut>(
        &self,
        mut session: F,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut attempt: u64 = 0;

        loop {
            if *shutdown.borrow() {
                break;
            }
            attempt += 1;

            match session(attempt).await {
                Ok(()) => break,
                Err(e) if attempt == 1 && e.is_fatal() => {
                    error!(error = %e, "Feed cannot be reached with this configuration");
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, attempt, "Feed session ended");
                    info!(backoff_secs = self.backoff.as_secs_f64(), "Backing off before reconnect");
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.backoff) => {}
                () = stop_requested(&mut shutdown) => break,
            }
        }

        info!(attempts = attempt, "Feed supervisor stopped");
        Ok(())
    }
}
