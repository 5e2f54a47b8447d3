use std::time::{Duration, Instant};

/// Single-shot timer.
///
/// Arming replaces any pending deadline; firing disarms. Repeating behavior is
/// built by re-arming from the callback.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the timer `delay` after `now`.
    ///
    /// A deadline past what `Instant` can represent never fires.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = now.checked_add(delay);
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once when `now` has reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
