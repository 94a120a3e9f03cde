use crate::TimeSource;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// A monotonic time source anchored to the wall clock.
///
/// The clock reads `SystemTime::now()` once at construction and from then on
/// advances by the elapsed monotonic time (`Instant`). Wall-clock adjustments
/// (NTP steps, manual changes) made while a stream is running therefore never
/// move record timestamps backwards.
///
/// Each stream session constructs its own clock, so a long-lived process does
/// not drift away from the wall clock across sessions.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // wall-clock millis at `start`
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock at the current wall-clock time.
    ///
    /// A system clock set before 1970 is treated as the epoch itself.
    pub fn new() -> Self {
        let offset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self::with_offset(offset)
    }

    /// Anchors a clock at an explicit wall-clock time, in milliseconds since
    /// the Unix epoch.
    pub fn with_offset(epoch_offset: u64) -> Self {
        Self {
            start: Instant::now(),
            epoch_offset,
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.start.elapsed().as_millis() as u64
    }
}
