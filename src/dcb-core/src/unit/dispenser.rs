// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Pour units.
//!
//! A dispenser only remembers when its last pour started. Whether it is
//! still pouring is derived from that timestamp and the configured timeout;
//! nothing ever stops a pour on its own.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

pub const DEFAULT_POUR_TIMEOUT: Duration = Duration::from_millis(1000);

#[derive(Debug)]
pub struct Dispenser {
    id: usize,
    timeout: Duration,
    pour_start: Mutex<Option<Instant>>,
}

impl Dispenser {
    pub fn new(id: usize, timeout: Duration) -> Self {
        Self {
            id,
            timeout,
            pour_start: Mutex::new(None),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Restart the pour timer and return the recorded start.
    pub fn reset_pour_timeout(&self) -> Instant {
        let now = Instant::now();
        *self.lock_start() = Some(now);
        debug!("Dispenser {} pour started", self.id);
        now
    }

    pub fn pour_start(&self) -> Option<Instant> {
        *self.lock_start()
    }

    pub fn is_pouring(&self) -> bool {
        self.is_pouring_at(Instant::now())
    }

    pub fn is_pouring_at(&self, now: Instant) -> bool {
        self.pour_start()
            .map(|start| now.saturating_duration_since(start) < self.timeout)
            .unwrap_or(false)
    }

    fn lock_start(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.pour_start
            .lock()
            .expect("dispenser pour mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dispenser_is_idle() {
        let dispenser = Dispenser::new(3, DEFAULT_POUR_TIMEOUT);
        assert_eq!(dispenser.id(), 3);
        assert_eq!(dispenser.pour_start(), None);
        assert!(!dispenser.is_pouring());
    }

    #[test]
    fn test_reset_records_current_time() {
        let dispenser = Dispenser::new(0, DEFAULT_POUR_TIMEOUT);
        let before = Instant::now();
        let stamp = dispenser.reset_pour_timeout();
        let after = Instant::now();
        assert_eq!(dispenser.pour_start(), Some(stamp));
        assert!(before <= stamp && stamp <= after);
    }

    #[test]
    fn test_pour_is_active_until_timeout() {
        let dispenser = Dispenser::new(0, Duration::from_millis(500));
        let start = dispenser.reset_pour_timeout();
        assert!(dispenser.is_pouring_at(start));
        assert!(dispenser.is_pouring_at(start + Duration::from_millis(499)));
        assert!(!dispenser.is_pouring_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_reset_extends_pour() {
        let dispenser = Dispenser::new(0, Duration::from_millis(500));
        let first = dispenser.reset_pour_timeout();
        std::thread::sleep(Duration::from_millis(5));
        let second = dispenser.reset_pour_timeout();
        assert!(second > first);
        assert!(dispenser.is_pouring_at(first + Duration::from_millis(501)));
    }
}
