// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_pair::WorkerEndpoints;
use crate::completion_signaling::CompletionNotifier;
use crate::correlation_token::CorrelationToken;
use crate::error::WorkerError;
use crate::random::Random;
use crate::timer::Timer;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

/// Worker that echoes correlation tokens after a simulated delay
///
/// Loop: wait for a task, sleep, write the token back, notify.
/// Ends when the coordinator closes the task channel.
pub struct Worker<R, W, N> {
    id: usize,
    endpoints: WorkerEndpoints<R, W>,
    notifier: N,
    timer: Arc<dyn Timer>,
    random: Arc<dyn Random>,
    max_delay_secs: u64,
}

impl<R, W, N> Worker<R, W, N>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
    N: CompletionNotifier,
{
    pub fn new(
        id: usize,
        endpoints: WorkerEndpoints<R, W>,
        notifier: N,
        timer: Arc<dyn Timer>,
        random: Arc<dyn Random>,
        max_delay_secs: u64,
    ) -> Self {
        Self {
            id,
            endpoints,
            notifier,
            timer,
            random,
            max_delay_secs,
        }
    }

    /// Process tasks until the task channel is closed
    ///
    /// The per-worker tally is kept by the coordinator, which counts drained
    /// results; the local count here only feeds the exit log.
    pub async fn run(mut self) -> Result<(), WorkerError> {
        info!(worker = self.id, "worker started");
        let mut completed = 0usize;

        while let Some(token) = self
            .endpoints
            .next_task()
            .await
            .map_err(WorkerError::TaskRead)?
        {
            debug!(worker = self.id, %token, "received task");
            self.run_task(token).await?;
            completed += 1;
        }

        info!(
            worker = self.id,
            completed, "task channel closed, worker exiting"
        );
        self.endpoints.close().await.map_err(WorkerError::Teardown)
    }

    async fn run_task(&mut self, token: CorrelationToken) -> Result<(), WorkerError> {
        let delay = sample_delay(self.random.as_ref(), self.max_delay_secs);
        debug!(worker = self.id, %token, delay_secs = delay, "working");
        self.timer.sleep(Duration::from_secs(delay)).await;

        self.endpoints
            .send_result(token)
            .await
            .map_err(WorkerError::ResultWrite)?;
        // The result is in the channel before the flag flips to Done
        self.notifier.notify()?;
        Ok(())
    }
}

/// Uniform delay in [1, max_delay_secs]
pub fn sample_delay(random: &dyn Random, max_delay_secs: u64) -> u64 {
    random.u64(1..=max_delay_secs.max(1))
}
