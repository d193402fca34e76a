// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Coordinator-side view of one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState {
    /// Eligible for a new assignment or for shutdown
    Idle = 0,
    /// Task in flight, notification not yet raised
    Busy = 1,
    /// Notification raised, a result is waiting on the result channel
    Done = 2,
    /// The worker loop ended with an error
    Failed = 3,
    /// Channels closed and worker joined
    Terminated = 4,
}

impl WorkerState {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a value previously produced by [`WorkerState::as_u8`]
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => WorkerState::Idle,
            1 => WorkerState::Busy,
            2 => WorkerState::Done,
            4 => WorkerState::Terminated,
            _ => WorkerState::Failed,
        }
    }
}
