// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-worker task and result channels
//!
//! A [`ChannelPair`] is split exactly once into the coordinator's half and the
//! worker's half. Each endpoint is moved into its single owner, so no other
//! execution unit can hold a stray copy of a write end and mask end-of-stream.

use crate::channel_factory::ChannelFactory;
use crate::correlation_token::{CorrelationToken, CorrelationTokenCodec};
use crate::error::PoolError;
use futures::{SinkExt, StreamExt};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

/// Both channels of one worker, before ownership is handed out
pub struct ChannelPair<R, W> {
    worker_id: usize,
    task_read: R,
    task_write: W,
    result_read: R,
    result_write: W,
}

impl<R, W> ChannelPair<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create the task channel, then the result channel, for `worker_id`
    pub fn create<F>(factory: &F, worker_id: usize) -> Result<Self, PoolError>
    where
        F: ChannelFactory<Reader = R, Writer = W>,
    {
        let (task_read, task_write) =
            factory
                .create_channel()
                .map_err(|source| PoolError::ChannelSetup {
                    worker_id,
                    channel: "task",
                    source,
                })?;
        let (result_read, result_write) =
            factory
                .create_channel()
                .map_err(|source| PoolError::ChannelSetup {
                    worker_id,
                    channel: "result",
                    source,
                })?;

        Ok(Self {
            worker_id,
            task_read,
            task_write,
            result_read,
            result_write,
        })
    }

    /// Hand the task-write and result-read ends to the coordinator and the
    /// task-read and result-write ends to the worker
    pub fn split(self) -> (CoordinatorEndpoints<R, W>, WorkerEndpoints<R, W>) {
        let coordinator = CoordinatorEndpoints {
            worker_id: self.worker_id,
            task_tx: FramedWrite::new(self.task_write, CorrelationTokenCodec),
            result_rx: FramedRead::new(self.result_read, CorrelationTokenCodec),
        };
        let worker = WorkerEndpoints {
            task_rx: FramedRead::new(self.task_read, CorrelationTokenCodec),
            result_tx: FramedWrite::new(self.result_write, CorrelationTokenCodec),
        };
        (coordinator, worker)
    }
}

/// The coordinator's ends of one worker's channels
pub struct CoordinatorEndpoints<R, W> {
    worker_id: usize,
    task_tx: FramedWrite<W, CorrelationTokenCodec>,
    result_rx: FramedRead<R, CorrelationTokenCodec>,
}

impl<R, W> CoordinatorEndpoints<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub async fn send_task(&mut self, token: CorrelationToken) -> Result<(), PoolError> {
        self.task_tx
            .send(token)
            .await
            .map_err(|source| PoolError::TaskWrite {
                worker_id: self.worker_id,
                source,
            })
    }

    /// Read one echoed token
    /// Only called once the worker has signalled completion, so it does not block for long
    pub async fn recv_result(&mut self) -> Result<CorrelationToken, PoolError> {
        match self.result_rx.next().await {
            Some(Ok(token)) => Ok(token),
            Some(Err(source)) => Err(PoolError::ResultRead {
                worker_id: self.worker_id,
                source,
            }),
            None => Err(PoolError::ResultChannelClosed {
                worker_id: self.worker_id,
            }),
        }
    }

    /// Close the task-write and result-read ends
    /// The worker sees end-of-stream on its next task read
    pub async fn close(self) -> Result<(), PoolError> {
        let Self {
            worker_id,
            mut task_tx,
            result_rx,
        } = self;
        drop(result_rx);
        task_tx
            .close()
            .await
            .map_err(|source| PoolError::Teardown { worker_id, source })
    }
}

/// The worker's ends of its own channels
pub struct WorkerEndpoints<R, W> {
    task_rx: FramedRead<R, CorrelationTokenCodec>,
    result_tx: FramedWrite<W, CorrelationTokenCodec>,
}

impl<R, W> WorkerEndpoints<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Next token, or `None` once the coordinator has closed the task channel
    pub async fn next_task(&mut self) -> io::Result<Option<CorrelationToken>> {
        self.task_rx.next().await.transpose()
    }

    pub async fn send_result(&mut self, token: CorrelationToken) -> io::Result<()> {
        self.result_tx.send(token).await
    }

    pub async fn close(self) -> io::Result<()> {
        let Self {
            task_rx,
            mut result_tx,
        } = self;
        drop(task_rx);
        result_tx.close().await
    }
}
