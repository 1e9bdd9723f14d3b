// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Actuator motion simulator.
//!
//! A move is modelled as "reaches the target once the configured timeout
//! elapses, unless stopped first". Each move runs as its own tokio task that
//! polls a per-task stop signal. Starting a new move retires the previous
//! task (stop, then join) before the next one is spawned, so at most one
//! motion task owns an actuator at any instant.
//!
//! Position and deadline fields only change together under the actuator's
//! state lock. Readers therefore see one of three states: idle at rest,
//! idle at the last reached target, or moving with the sentinel position.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error};

pub const DEFAULT_MOVE_TIMEOUT: Duration = Duration::from_millis(1000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Current position reported while a move is in flight.
pub const SENTINEL_POSITION: i64 = 0;

/// How long a retiring task may take to honour a stop, on top of one poll.
const STOP_GRACE: Duration = Duration::from_secs(1);
/// Stand-in deadline for timeouts too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Consistent view of an actuator's position fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorSnapshot {
    pub current_position: i64,
    pub target_position: i64,
    pub moving: bool,
}

#[derive(Debug, Default)]
struct MotionState {
    current_position: i64,
    target_position: i64,
    deadline: Option<Instant>,
    /// Bumped by every `begin`; a motion task only settles its own generation.
    generation: u64,
}

impl MotionState {
    fn begin(&mut self, target: i64, deadline: Instant) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.target_position = target;
        self.current_position = SENTINEL_POSITION;
        self.deadline = Some(deadline);
        self.generation
    }

    fn abort(&mut self) {
        self.current_position = SENTINEL_POSITION;
        self.target_position = 0;
        self.deadline = None;
    }

    fn arrive(&mut self, target: i64) {
        self.current_position = target;
        self.target_position = 0;
        self.deadline = None;
    }

    fn snapshot(&self) -> ActuatorSnapshot {
        ActuatorSnapshot {
            current_position: self.current_position,
            target_position: self.target_position,
            moving: self.deadline.is_some(),
        }
    }
}

struct MotionTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Positional unit with cancellable, time-bounded moves.
pub struct Actuator {
    id: usize,
    timeout: Duration,
    poll_interval: Duration,
    state: Arc<Mutex<MotionState>>,
    /// Held for the whole of `start_move`, which serialises generations.
    task: AsyncMutex<Option<MotionTask>>,
}

impl Actuator {
    pub fn new(id: usize, timeout: Duration) -> Self {
        Self::with_poll_interval(id, timeout, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(id: usize, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            id,
            timeout,
            poll_interval,
            state: Arc::new(Mutex::new(MotionState::default())),
            task: AsyncMutex::new(None),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Start moving towards `target`.
    ///
    /// Any move already in flight is stopped first and this call waits until
    /// its task has exited. The new move itself runs in the background, so
    /// the call returns as soon as it has been launched. Repeating the current
    /// target still restarts the move with a fresh deadline.
    ///
    /// If this future is dropped while the previous task is still being
    /// retired, that task stays registered and the next `start_move` waits
    /// for it instead.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start_move(&self, target: i64) {
        let mut slot = self.task.lock().await;
        self.retire(&mut slot).await;

        let started = Instant::now();
        let deadline = started
            .checked_add(self.timeout)
            .unwrap_or_else(|| started + FAR_FUTURE);
        let generation = self.lock_state().begin(target, deadline);

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_motion(
            self.id,
            target,
            deadline,
            self.poll_interval,
            Arc::clone(&self.state),
            stop_rx,
            generation,
        ));
        *slot = Some(MotionTask { stop_tx, handle });
        debug!(
            "Actuator {} moving to {} (timeout {:?})",
            self.id, target, self.timeout
        );
    }

    /// Stop the registered motion task, if any, and wait for it to vacate
    /// the actuator.
    ///
    /// The slot is only cleared once the join has resolved, so a cancelled
    /// caller never leaves a live task unaccounted for.
    ///
    /// Panics if the task has not observed its stop signal within one poll
    /// interval plus `STOP_GRACE`.
    async fn retire(&self, slot: &mut Option<MotionTask>) {
        let Some(task) = slot.as_mut() else {
            return;
        };
        // The receiver is gone once the task has finished on its own.
        task.stop_tx.send_replace(true);
        let grace = self.poll_interval + STOP_GRACE;
        let joined = timeout(grace, &mut task.handle).await;
        if joined.is_ok() {
            *slot = None;
        }
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Ok(Err(_)) => {
                // Cancelled by runtime shutdown; nothing left to wait for.
            }
            Err(_) => {
                error!(
                    "Actuator {} motion task ignored stop request for {:?}",
                    self.id, grace
                );
                panic!(
                    "actuator {} motion task did not stop within {:?}",
                    self.id, grace
                );
            }
        }
    }

    pub fn current_position(&self) -> i64 {
        self.lock_state().current_position
    }

    pub fn target_position(&self) -> i64 {
        self.lock_state().target_position
    }

    pub fn is_moving(&self) -> bool {
        self.lock_state().deadline.is_some()
    }

    /// All position fields read under one lock acquisition.
    pub fn snapshot(&self) -> ActuatorSnapshot {
        self.lock_state().snapshot()
    }

    fn lock_state(&self) -> MutexGuard<'_, MotionState> {
        self.state.lock().expect("actuator state mutex poisoned")
    }
}

impl Drop for Actuator {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.stop_tx.send_replace(true);
            task.handle.abort();
        }
    }
}

impl std::fmt::Debug for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actuator")
            .field("id", &self.id)
            .field("timeout", &self.timeout)
            .field("state", &self.snapshot())
            .finish()
    }
}

/// Body of one motion generation.
async fn run_motion(
    id: usize,
    target: i64,
    deadline: Instant,
    poll_interval: Duration,
    state: Arc<Mutex<MotionState>>,
    stop_rx: watch::Receiver<bool>,
    generation: u64,
) {
    loop {
        sleep(poll_interval).await;

        let finished = {
            let mut state = state.lock().expect("actuator state mutex poisoned");
            if state.generation != generation {
                debug!("Actuator {} move to {} superseded", id, target);
                true
            } else if *stop_rx.borrow() {
                state.abort();
                debug!("Actuator {} move to {} aborted", id, target);
                true
            } else if Instant::now() >= deadline {
                state.arrive(target);
                debug!("Actuator {} reached {}", id, target);
                true
            } else {
                false
            }
        };
        if finished {
            return;
        }
    }
}
