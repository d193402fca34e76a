// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

pub mod atomic_completion_signaling;
pub use atomic_completion_signaling::{AtomicCompletionSignaling, AtomicNotifier};

pub mod pipe_channel_factory;
pub use pipe_channel_factory::PipeChannelFactory;

pub mod tokio_runtime;
pub use tokio_runtime::TokioRuntime;

mod types;
pub use types::PipeCoordinator;
