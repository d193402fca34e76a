// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use worker_pool_core::{PoolError, WorkerError, WorkerRuntime};

/// Tokio task-based runtime
pub struct TokioRuntime;

impl WorkerRuntime for TokioRuntime {
    type Handle = JoinHandle<Result<(), WorkerError>>;

    fn spawn<F, Fut>(worker_id: usize, f: F) -> Result<Self::Handle, PoolError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| PoolError::Spawn {
            worker_id,
            reason: e.to_string(),
        })?;
        Ok(runtime.spawn(f()))
    }

    async fn join(worker_id: usize, handle: Self::Handle) -> Result<(), PoolError> {
        match handle.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(PoolError::WorkerFailed { worker_id, source }),
            Err(e) => Err(PoolError::Join {
                worker_id,
                reason: e.to_string(),
            }),
        }
    }
}
