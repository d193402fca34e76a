// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::AtomicCompletionSignaling;
use crate::PipeChannelFactory;
use crate::TokioRuntime;
use worker_pool_core::Coordinator;

pub type PipeCoordinator = Coordinator<PipeChannelFactory, AtomicCompletionSignaling, TokioRuntime>;
