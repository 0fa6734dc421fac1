//! Lock-free run progress.
//!
//! [`Progress`] is written by the worker and read by any number of
//! pollers. The value only grows and ends at exactly 100.

use std::sync::atomic::{AtomicU8, Ordering};

/// Completion value published once the run is over.
pub const COMPLETE: u8 = 100;

/// Percentage of a run completed, shared between worker and pollers.
pub struct Progress {
    percent: AtomicU8,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

// Compile-time assertion: Progress must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Progress>();
};

impl Progress {
    /// A counter at 0.
    pub fn new() -> Self {
        Self {
            percent: AtomicU8::new(0),
        }
    }

    /// Publish progress after `iteration` of `steps`.
    ///
    /// Stores `round(100 · iteration / steps)`, held below
    /// [`COMPLETE`] until [`finish`](Self::finish). Returns the stored
    /// value.
    pub fn publish(&self, iteration: usize, steps: usize) -> u8 {
        let percent = percent_of(iteration, steps).min(COMPLETE - 1);
        self.percent.fetch_max(percent, Ordering::Release);
        percent
    }

    /// Mark the run complete.
    pub fn finish(&self) {
        self.percent.store(COMPLETE, Ordering::Release);
    }

    /// Read the current value.
    pub fn get(&self) -> u8 {
        self.percent.load(Ordering::Acquire)
    }

    /// `true` once [`finish`](Self::finish) was called.
    pub fn is_complete(&self) -> bool {
        self.get() == COMPLETE
    }
}

fn percent_of(iteration: usize, steps: usize) -> u8 {
    if steps == 0 {
        return 0;
    }
    let ratio = (iteration as f64 / steps as f64).clamp(0.0, 1.0);
    (ratio * 100.0).round() as u8
}
