//! Periodic keep-alive for the backend session.

use crate::backend::SessionManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    pub interval_secs: u64,
    pub max_retries: u32,
    pub ping_timeout_secs: u64,
    pub use_get: bool,
}

/// Spawn the keep-alive task: one cycle per tick, each cycle running to
/// completion (including its bounded reconnect retries) before the next tick
/// is taken, so cycles never overlap.
pub fn spawn(session: Arc<SessionManager>, config: KeepAliveConfig) {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        // The initial connect happens at startup; skip the immediate tick.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            debug!(
                "Keep-alive cycle (interval {}s, max {} retries)",
                config.interval_secs, config.max_retries
            );

            session
                .keep_alive_cycle(
                    config.max_retries,
                    Duration::from_secs(config.ping_timeout_secs),
                    config.use_get,
                )
                .await;
        }
    });
}
