//! Network identity reset and wait primitives
//!
//! Both are injected into the retry layer so tests can observe resets and
//! waits without touching the network or the wall clock.

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

/// Changes the crawler's apparent network origin
///
/// Implementations return once the new identity is usable, or once they have
/// given up; failures are logged rather than reported.
#[async_trait]
pub trait IdentityReset: Send + Sync {
    async fn reset_identity(&self);
}

/// Identity reset that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReset;

#[async_trait]
impl IdentityReset for NoopReset {
    async fn reset_identity(&self) {
        tracing::debug!("No reset command configured; keeping current identity");
    }
}

/// Identity reset that runs an external command (e.g. restarting a relay)
#[derive(Debug, Clone)]
pub struct CommandReset {
    program: String,
    args: Vec<String>,
}

impl CommandReset {
    /// Builds a reset from an argv list; returns `None` for an empty list
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl IdentityReset for CommandReset {
    async fn reset_identity(&self) {
        tracing::info!("Resetting network identity: {} {}", self.program, self.args.join(" "));
        match Command::new(&self.program).args(&self.args).status().await {
            Ok(status) if status.success() => {
                tracing::debug!("Identity reset command finished");
            }
            Ok(status) => {
                tracing::warn!("Identity reset command exited with {}", status);
            }
            Err(e) => {
                tracing::warn!("Failed to run identity reset command: {}", e);
            }
        }
    }
}

/// Suspends the crawl for a given duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
