//! Injected time source
//!
//! The poller and the pipeline driver wait through this trait instead of
//! calling `tokio::time::sleep` directly, so tests can drive time
//! deterministically without real delays.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Monotonic time source with a suspendable wait.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock implementation backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
