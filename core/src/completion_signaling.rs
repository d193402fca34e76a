// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::NotifyError;
use crate::worker_state::WorkerState;
use std::future::Future;

/// Handle given to one worker for raising its completion signal
///
/// Implementations must only update the worker's flag and wake the
/// coordinator. No I/O and no logging happen on this path.
pub trait CompletionNotifier: Clone + Send + Sync + 'static {
    /// Transition this worker from Busy to Done
    /// Fails if the worker was not Busy
    fn notify(&self) -> Result<(), NotifyError>;

    /// Flag this worker as Failed so the coordinator reaps it
    fn notify_failure(&self);
}

/// Trait for abstracting completion signaling mechanisms
/// Holds the per-worker state flags shared between the coordinator and the workers
pub trait CompletionSignaling: Send {
    /// The notifier type handed to workers
    type Notifier: CompletionNotifier;

    /// Setup completion signaling for N workers, all Idle
    fn setup(num_workers: usize) -> Self;

    /// Get the notifier for a specific worker
    fn get_notifier(&self, worker_id: usize) -> Self::Notifier;

    /// Current state of a worker
    fn state(&self, worker_id: usize) -> WorkerState;

    /// Atomically move a worker from `from` to `to`
    /// Returns false if the worker was not in `from`
    fn transition(&self, worker_id: usize, from: WorkerState, to: WorkerState) -> bool;

    /// Wait until at least one notifier has fired since the last call
    /// May return spuriously; callers re-inspect the states afterwards
    fn wait_next(&mut self) -> impl Future<Output = ()> + Send;
}
