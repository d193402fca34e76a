// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::{PoolError, WorkerError};
use std::future::Future;

/// Trait for abstracting worker runtime (tasks, threads, processes)
pub trait WorkerRuntime: Send + 'static {
    type Handle: Send;

    /// Spawn a worker unit
    fn spawn<F, Fut>(worker_id: usize, f: F) -> Result<Self::Handle, PoolError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), WorkerError>> + Send + 'static;

    /// Wait for the worker to terminate
    /// A worker that ended with an error surfaces as `PoolError::WorkerFailed`
    fn join(
        worker_id: usize,
        handle: Self::Handle,
    ) -> impl Future<Output = Result<(), PoolError>> + Send;
}
