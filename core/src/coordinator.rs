// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel_factory::ChannelFactory;
use crate::channel_pair::{ChannelPair, CoordinatorEndpoints};
use crate::completion_signaling::{CompletionNotifier, CompletionSignaling};
use crate::config::PoolConfig;
use crate::correlation_token::CorrelationToken;
use crate::error::PoolError;
use crate::random::Random;
use crate::report::CompletionReport;
use crate::timer::Timer;
use crate::worker::Worker;
use crate::worker_runtime::WorkerRuntime;
use crate::worker_state::WorkerState;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Coordinator-side bookkeeping for one worker
struct WorkerSlot<F: ChannelFactory, H> {
    endpoints: Option<CoordinatorEndpoints<F::Reader, F::Writer>>,
    handle: Option<H>,
    last_token: Option<CorrelationToken>,
    completed: usize,
}

/// Coordinator distributes tasks round-robin to a fixed pool of workers
/// Generic over the channel transport, the completion signaling and the worker runtime
pub struct Coordinator<F, S, RT> {
    config: PoolConfig,
    factory: F,
    timer: Arc<dyn Timer>,
    random: Arc<dyn Random>,
    _phantom: PhantomData<(S, RT)>,
}

impl<F, S, RT> Coordinator<F, S, RT>
where
    F: ChannelFactory,
    S: CompletionSignaling,
    RT: WorkerRuntime,
{
    pub fn new(
        config: PoolConfig,
        factory: F,
        timer: Arc<dyn Timer>,
        random: Arc<dyn Random>,
    ) -> Self {
        Self {
            config,
            factory,
            timer,
            random,
            _phantom: PhantomData,
        }
    }

    /// Runs the pool until every task is completed and every worker has terminated
    pub async fn run(self) -> Result<CompletionReport, PoolError> {
        let num_workers = self.config.num_workers();
        let mut signaling = S::setup(num_workers);
        let mut slots = self.start_workers(&signaling)?;

        info!(
            workers = num_workers,
            tasks = self.config.num_tasks(),
            max_delay_secs = self.config.max_delay_secs(),
            "worker pool started"
        );

        let mut remaining = self.config.num_tasks();
        let mut terminated = 0;

        while terminated < num_workers {
            let mut progressed = false;

            for (worker_id, slot) in slots.iter_mut().enumerate() {
                match signaling.state(worker_id) {
                    WorkerState::Idle if remaining > 0 => {
                        let token = CorrelationToken::new(remaining as u64);
                        if Self::dispatch(&signaling, worker_id, slot, token).await? {
                            remaining -= 1;
                            progressed = true;
                        }
                    }
                    WorkerState::Idle => {
                        Self::shut_down(&signaling, worker_id, slot).await?;
                        terminated += 1;
                        progressed = true;
                    }
                    WorkerState::Done => {
                        Self::drain(&signaling, worker_id, slot).await?;
                        progressed = true;
                    }
                    WorkerState::Failed => {
                        let err = Self::reap_failed(worker_id, slot).await;
                        error!(worker = worker_id, error = %err, "worker failed, aborting");
                        return Err(err);
                    }
                    WorkerState::Busy | WorkerState::Terminated => {}
                }
            }

            if !progressed {
                signaling.wait_next().await;
            }
        }

        info!("all tasks completed, all workers terminated");
        Ok(CompletionReport::new(
            slots.iter().map(|slot| slot.completed).collect(),
        ))
    }

    /// Create every channel pair, then spawn the workers, each owning only its own endpoints
    fn start_workers(&self, signaling: &S) -> Result<Vec<WorkerSlot<F, RT::Handle>>, PoolError> {
        let num_workers = self.config.num_workers();
        let pairs = (0..num_workers)
            .map(|worker_id| ChannelPair::create(&self.factory, worker_id))
            .collect::<Result<Vec<_>, _>>()?;

        let mut slots = Vec::with_capacity(num_workers);
        for (worker_id, pair) in pairs.into_iter().enumerate() {
            let (coordinator_ends, worker_ends) = pair.split();
            let notifier = signaling.get_notifier(worker_id);
            let worker = Worker::new(
                worker_id,
                worker_ends,
                notifier.clone(),
                self.timer.clone(),
                self.random.clone(),
                self.config.max_delay_secs(),
            );

            let handle = RT::spawn(worker_id, move || async move {
                let outcome = worker.run().await;
                if outcome.is_err() {
                    notifier.notify_failure();
                }
                outcome
            })?;
            debug!(worker = worker_id, "worker spawned");

            slots.push(WorkerSlot {
                endpoints: Some(coordinator_ends),
                handle: Some(handle),
                last_token: None,
                completed: 0,
            });
        }
        Ok(slots)
    }

    async fn dispatch(
        signaling: &S,
        worker_id: usize,
        slot: &mut WorkerSlot<F, RT::Handle>,
        token: CorrelationToken,
    ) -> Result<bool, PoolError> {
        // Busy before the write so the worker's notification always finds Busy
        if !signaling.transition(worker_id, WorkerState::Idle, WorkerState::Busy) {
            return Ok(false);
        }
        info!(worker = worker_id, %token, "assigning task");
        let endpoints = Self::endpoints(worker_id, slot)?;
        endpoints.send_task(token).await?;
        slot.last_token = Some(token);
        Ok(true)
    }

    async fn drain(
        signaling: &S,
        worker_id: usize,
        slot: &mut WorkerSlot<F, RT::Handle>,
    ) -> Result<(), PoolError> {
        let expected = slot
            .last_token
            .take()
            .ok_or(PoolError::ProtocolViolation {
                worker_id,
                reason: "worker signalled completion with no task in flight",
            })?;
        let endpoints = Self::endpoints(worker_id, slot)?;
        let received = endpoints.recv_result().await?;
        if received != expected {
            return Err(PoolError::EchoMismatch {
                worker_id,
                expected,
                received,
            });
        }

        slot.completed += 1;
        info!(worker = worker_id, token = %received, "worker completed task");
        if !signaling.transition(worker_id, WorkerState::Done, WorkerState::Idle) {
            // Only a failure can overwrite Done; the next pass reaps it
            debug!(
                worker = worker_id,
                state = ?signaling.state(worker_id),
                "worker left Done before it was reset to Idle"
            );
        }
        Ok(())
    }

    async fn shut_down(
        signaling: &S,
        worker_id: usize,
        slot: &mut WorkerSlot<F, RT::Handle>,
    ) -> Result<(), PoolError> {
        info!(worker = worker_id, "no more tasks, closing channels");
        if let Some(endpoints) = slot.endpoints.take() {
            endpoints.close().await?;
        }
        if let Some(handle) = slot.handle.take() {
            RT::join(worker_id, handle).await?;
        }
        if !signaling.transition(worker_id, WorkerState::Idle, WorkerState::Terminated) {
            debug!(
                worker = worker_id,
                state = ?signaling.state(worker_id),
                "joined worker was not Idle when marked Terminated"
            );
        }
        info!(
            worker = worker_id,
            completed = slot.completed,
            "worker terminated"
        );
        Ok(())
    }

    async fn reap_failed(worker_id: usize, slot: &mut WorkerSlot<F, RT::Handle>) -> PoolError {
        slot.endpoints.take();
        match slot.handle.take() {
            Some(handle) => match RT::join(worker_id, handle).await {
                Err(e) => e,
                Ok(()) => PoolError::WorkerVanished { worker_id },
            },
            None => PoolError::WorkerVanished { worker_id },
        }
    }

    fn endpoints(
        worker_id: usize,
        slot: &mut WorkerSlot<F, RT::Handle>,
    ) -> Result<&mut CoordinatorEndpoints<F::Reader, F::Writer>, PoolError> {
        slot.endpoints
            .as_mut()
            .ok_or(PoolError::ProtocolViolation {
                worker_id,
                reason: "channels used after they were closed",
            })
    }
}
