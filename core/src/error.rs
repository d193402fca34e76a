// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the worker pool
//!
//! Every error is fatal to the execution unit that observes it. Nothing here
//! is retried: a worker error ends that worker, a coordinator error ends the run.

use crate::correlation_token::CorrelationToken;
use crate::worker_state::WorkerState;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the coordinator
#[derive(Error, Debug)]
pub enum PoolError {
    /// A task or result channel could not be created
    #[error("failed to create {channel} channel for worker {worker_id}: {source}")]
    ChannelSetup {
        worker_id: usize,
        channel: &'static str,
        #[source]
        source: io::Error,
    },

    /// Closing the coordinator's endpoints for a worker failed
    #[error("failed to close channels of worker {worker_id}: {source}")]
    Teardown {
        worker_id: usize,
        #[source]
        source: io::Error,
    },

    /// The worker unit could not be started
    #[error("failed to spawn worker {worker_id}: {reason}")]
    Spawn { worker_id: usize, reason: String },

    /// Waiting for the worker unit to terminate failed
    #[error("failed to join worker {worker_id}: {reason}")]
    Join { worker_id: usize, reason: String },

    /// Writing a token to a task channel failed
    #[error("failed to write task to worker {worker_id}: {source}")]
    TaskWrite {
        worker_id: usize,
        #[source]
        source: io::Error,
    },

    /// Reading a token from a result channel failed
    #[error("failed to read result from worker {worker_id}: {source}")]
    ResultRead {
        worker_id: usize,
        #[source]
        source: io::Error,
    },

    /// The worker signalled completion but its result channel was already closed
    #[error("result channel of worker {worker_id} closed before a result arrived")]
    ResultChannelClosed { worker_id: usize },

    /// The echoed token does not match the last dispatched one
    #[error("worker {worker_id} echoed token {received}, expected {expected}")]
    EchoMismatch {
        worker_id: usize,
        expected: CorrelationToken,
        received: CorrelationToken,
    },

    /// The worker loop ended with an error
    #[error("worker {worker_id} failed: {source}")]
    WorkerFailed {
        worker_id: usize,
        #[source]
        source: WorkerError,
    },

    /// The worker was flagged as failed but joined without an error
    #[error("worker {worker_id} flagged a failure but exited cleanly")]
    WorkerVanished { worker_id: usize },

    /// Coordinator bookkeeping disagrees with the worker's state flag
    #[error("protocol violation for worker {worker_id}: {reason}")]
    ProtocolViolation {
        worker_id: usize,
        reason: &'static str,
    },
}

/// Errors that terminate a single worker
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("failed to read task: {0}")]
    TaskRead(#[source] io::Error),

    #[error("failed to write result: {0}")]
    ResultWrite(#[source] io::Error),

    #[error("failed to raise completion: {0}")]
    Notify(#[from] NotifyError),

    #[error("failed to close result channel: {0}")]
    Teardown(#[source] io::Error),
}

/// Errors raised by the completion notifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Only a busy worker may signal completion
    #[error("worker {worker_id} signalled completion while {state:?}")]
    UnexpectedState { worker_id: usize, state: WorkerState },
}

/// Configuration and input validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing value for {0}")]
    Missing(&'static str),

    #[error("{name} must be a positive integer, got {value}")]
    NotPositive { name: &'static str, value: u64 },

    #[error("{name} is too large for this platform, got {value}")]
    TooLarge { name: &'static str, value: u64 },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
