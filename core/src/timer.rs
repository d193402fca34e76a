// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::time::Duration;
use tokio::time::Instant;

/// Source of the simulated work delay
///
/// Workers only ever wait through this trait, so tests can record the sampled
/// delays instead of sleeping for whole seconds.
#[async_trait::async_trait]
pub trait Timer: Send + Sync {
    /// Returns once `duration` has fully elapsed
    async fn sleep(&self, duration: Duration);
}

/// Waits on the tokio time driver against a fixed deadline
pub struct TokioTimer;

#[async_trait::async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        // A delay task is never shortened: wake-ups before the deadline re-arm it
        while Instant::now() < deadline {
            tokio::time::sleep_until(deadline).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_timer_waits_for_full_delay() {
        let delay = Duration::from_millis(30);
        let started = Instant::now();
        TokioTimer.sleep(delay).await;
        assert!(started.elapsed() >= delay);
    }
}
