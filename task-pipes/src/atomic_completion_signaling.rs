// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use worker_pool_core::{CompletionNotifier, CompletionSignaling, NotifyError, WorkerState};

/// Flags shared between the coordinator and the workers
struct SharedFlags {
    states: Box<[AtomicU8]>,
    wake: Notify,
}

impl SharedFlags {
    fn load(&self, worker_id: usize) -> WorkerState {
        WorkerState::from_u8(self.states[worker_id].load(Ordering::Acquire))
    }

    fn compare_exchange(
        &self,
        worker_id: usize,
        from: WorkerState,
        to: WorkerState,
    ) -> Result<(), WorkerState> {
        self.states[worker_id]
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(WorkerState::from_u8)
    }
}

/// Per-worker atomic state flags with a single wake-up for the coordinator
///
/// Each flag has one worker-side writer (Busy to Done, anything to Failed) and
/// the coordinator for every other transition. A notification stores a permit
/// in the `Notify`, so a signal raised while the coordinator is scanning is not lost.
pub struct AtomicCompletionSignaling {
    shared: Arc<SharedFlags>,
}

impl CompletionSignaling for AtomicCompletionSignaling {
    type Notifier = AtomicNotifier;

    fn setup(num_workers: usize) -> Self {
        let states = (0..num_workers)
            .map(|_| AtomicU8::new(WorkerState::Idle.as_u8()))
            .collect();
        Self {
            shared: Arc::new(SharedFlags {
                states,
                wake: Notify::new(),
            }),
        }
    }

    fn get_notifier(&self, worker_id: usize) -> Self::Notifier {
        AtomicNotifier {
            worker_id,
            shared: self.shared.clone(),
        }
    }

    fn state(&self, worker_id: usize) -> WorkerState {
        self.shared.load(worker_id)
    }

    fn transition(&self, worker_id: usize, from: WorkerState, to: WorkerState) -> bool {
        self.shared.compare_exchange(worker_id, from, to).is_ok()
    }

    async fn wait_next(&mut self) {
        self.shared.wake.notified().await;
    }
}

/// Completion notifier bound to one worker's flag
#[derive(Clone)]
pub struct AtomicNotifier {
    worker_id: usize,
    shared: Arc<SharedFlags>,
}

impl CompletionNotifier for AtomicNotifier {
    fn notify(&self) -> Result<(), NotifyError> {
        self.shared
            .compare_exchange(self.worker_id, WorkerState::Busy, WorkerState::Done)
            .map_err(|state| NotifyError::UnexpectedState {
                worker_id: self.worker_id,
                state,
            })?;
        self.shared.wake.notify_one();
        Ok(())
    }

    fn notify_failure(&self) {
        self.shared.states[self.worker_id].store(WorkerState::Failed.as_u8(), Ordering::Release);
        self.shared.wake.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_notify_moves_busy_worker_to_done() {
        let signaling = AtomicCompletionSignaling::setup(3);
        assert!(signaling.transition(1, WorkerState::Idle, WorkerState::Busy));

        signaling.get_notifier(1).notify().unwrap();

        assert_eq!(signaling.state(0), WorkerState::Idle);
        assert_eq!(signaling.state(1), WorkerState::Done);
        assert_eq!(signaling.state(2), WorkerState::Idle);
    }

    #[test]
    fn test_notify_while_not_busy_is_rejected() {
        let signaling = AtomicCompletionSignaling::setup(2);
        let notifier = signaling.get_notifier(0);

        assert_eq!(
            notifier.notify(),
            Err(NotifyError::UnexpectedState {
                worker_id: 0,
                state: WorkerState::Idle
            })
        );

        signaling.transition(0, WorkerState::Idle, WorkerState::Busy);
        notifier.notify().unwrap();
        // A second signal before the coordinator drained the first one
        assert_eq!(
            notifier.notify(),
            Err(NotifyError::UnexpectedState {
                worker_id: 0,
                state: WorkerState::Done
            })
        );
    }

    #[test]
    fn test_transition_requires_expected_state() {
        let signaling = AtomicCompletionSignaling::setup(1);
        assert!(!signaling.transition(0, WorkerState::Done, WorkerState::Idle));
        assert!(signaling.transition(0, WorkerState::Idle, WorkerState::Terminated));
        assert_eq!(signaling.state(0), WorkerState::Terminated);
    }

    #[test]
    fn test_failure_overrides_any_state() {
        let signaling = AtomicCompletionSignaling::setup(2);
        signaling.transition(1, WorkerState::Idle, WorkerState::Busy);
        signaling.get_notifier(1).notify_failure();
        assert_eq!(signaling.state(1), WorkerState::Failed);
    }

    #[tokio::test]
    async fn test_signal_raised_before_wait_is_not_lost() {
        let mut signaling = AtomicCompletionSignaling::setup(1);
        signaling.transition(0, WorkerState::Idle, WorkerState::Busy);
        signaling.get_notifier(0).notify().unwrap();

        tokio::time::timeout(Duration::from_secs(1), signaling.wait_next())
            .await
            .expect("stored wake-up should complete the wait");
    }

    #[tokio::test]
    async fn test_wait_wakes_on_notification_from_another_task() {
        let mut signaling = AtomicCompletionSignaling::setup(2);
        signaling.transition(1, WorkerState::Idle, WorkerState::Busy);
        let notifier = signaling.get_notifier(1);

        let worker = tokio::spawn(async move {
            tokio::task::yield_now().await;
            notifier.notify()
        });

        tokio::time::timeout(Duration::from_secs(1), signaling.wait_next())
            .await
            .expect("wait_next should wake up");
        worker.await.unwrap().unwrap();
        assert_eq!(signaling.state(1), WorkerState::Done);
    }
}
