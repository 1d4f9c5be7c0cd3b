//! Time source abstraction
//!
//! Components that expire state (session idle sweep, rate-limit windows)
//! read time through [`Clock`] so tests can move time forward without
//! sleeping.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Abstraction over time sources for testability
pub trait Clock: Send + Sync + fmt::Debug {
    /// Monotonic instant for elapsed / timeout comparisons
    fn now(&self) -> Instant;

    /// Wall-clock time for timestamps shown to clients
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Production clock backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
///
/// Starts at the real current time and advances by [`ManualClock::advance`].
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    base_utc: DateTime<Utc>,
    offset: Mutex<Duration>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a manual clock anchored at the current time
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            base_utc: Utc::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }

    fn offset(&self) -> Duration {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let offset = chrono::TimeDelta::from_std(self.offset()).unwrap_or_default();
        self.base_utc + offset
    }
}
