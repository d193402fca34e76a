// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod channel_factory;
pub use channel_factory::ChannelFactory;

pub mod channel_pair;
pub use channel_pair::{ChannelPair, CoordinatorEndpoints, WorkerEndpoints};

pub mod completion_signaling;
pub use completion_signaling::{CompletionNotifier, CompletionSignaling};

pub mod config;
pub use config::{PoolConfig, PoolConfigFile, DEFAULT_WORKER_COUNT};

pub mod coordinator;
pub use coordinator::Coordinator;

pub mod correlation_token;
pub use correlation_token::{CorrelationToken, CorrelationTokenCodec};

mod error;
pub use error::{ConfigError, NotifyError, PoolError, WorkerError};

pub mod random;
pub use random::{FastrandRandom, Random};

mod report;
pub use report::CompletionReport;

pub mod timer;
pub use timer::{Timer, TokioTimer};

pub mod worker;
pub use worker::Worker;

pub mod worker_runtime;
pub use worker_runtime::WorkerRuntime;

mod worker_state;
pub use worker_state::WorkerState;
