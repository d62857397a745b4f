//! Time sources for overall recency tracking.
//!
//! A [`FrequencyList`](crate::FrequencyList) built with a [`Clock`] stamps
//! every touched element with [`Clock::now`] and resolves windowed removals
//! against [`Clock::earlier`]. Instants only need to be totally ordered; the
//! list never does arithmetic on them.
//!
//! ## Key Components
//!
//! - [`SystemClock`]: monotonic wall time, measured from the clock's creation
//! - [`ManualClock`]: deterministic time that only moves when told to
//!
//! ## Example Usage
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use freqlist::clock::{Clock, ManualClock};
//! use freqlist::FrequencyList;
//!
//! let clock = Rc::new(ManualClock::new());
//! let mut list = FrequencyList::with_clock(Rc::clone(&clock));
//!
//! list.update("a");
//! clock.advance(Duration::from_secs(10));
//! list.update("b");
//!
//! let expired = list
//!     .remove_overall_least_recent_outside(Duration::from_secs(5))
//!     .unwrap();
//! assert_eq!(expired, vec!["a"]);
//! assert_eq!(clock.now(), Duration::from_secs(10));
//! ```

use std::fmt::Debug;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Supplies the current time and "now minus a duration".
pub trait Clock {
    /// A point in time. Later instants compare greater.
    type Instant: Copy + Ord + Debug;

    /// The current time. Successive calls never go backwards.
    fn now(&self) -> Self::Instant;

    /// The instant `by` before [`now`](Self::now), saturating at the clock's
    /// earliest representable instant.
    fn earlier(&self, by: Duration) -> Self::Instant;
}

/// Monotonic clock backed by [`std::time::Instant`].
///
/// Instants are reported as the elapsed time since the clock was created, so
/// [`earlier`](Clock::earlier) can saturate at zero instead of underflowing.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    type Instant = Duration;

    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    #[inline]
    fn earlier(&self, by: Duration) -> Duration {
        self.now().saturating_sub(by)
    }
}

/// Clock that only moves when [`advance`](ManualClock::advance) or
/// [`set`](ManualClock::set) is called.
///
/// Share it with the list through `Rc`/`Arc` (or a reference) to keep a handle
/// for driving time from outside.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock that reads zero.
    pub fn new() -> Self {
        Self::starting_at(Duration::ZERO)
    }

    pub fn starting_at(start: Duration) -> Self {
        Self {
            nanos: AtomicU64::new(saturating_nanos(start)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let step = saturating_nanos(by);
        let _ = self
            .nanos
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(step))
            });
    }

    /// Jumps to `to`. Moving backwards is ignored so the clock stays monotonic.
    pub fn set(&self, to: Duration) {
        self.nanos.fetch_max(saturating_nanos(to), Ordering::Relaxed);
    }
}

fn saturating_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    type Instant = Duration;

    #[inline]
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }

    #[inline]
    fn earlier(&self, by: Duration) -> Duration {
        self.now().saturating_sub(by)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn earlier(&self, by: Duration) -> Self::Instant {
        (**self).earlier(by)
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn earlier(&self, by: Duration) -> Self::Instant {
        (**self).earlier(by)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }

    fn earlier(&self, by: Duration) -> Self::Instant {
        (**self).earlier(by)
    }
}
