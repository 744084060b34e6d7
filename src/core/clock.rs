//=========================================================================
// Frame Clock
//=========================================================================
//
// Converts wall-clock time into a bounded sequence of frame ticks.
//
// Architecture:
//   TimeSource::now() → raw delta → [min, max] clamp → ClockTick
//
// A tick is only emitted once at least `min_update_time` has elapsed
// since the previous emitted tick. Below that, the caller is told how
// long to wait and must retry. Deltas above `max_update_time` are
// clamped so a stall never turns into one enormous simulation step.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::trace;
use thiserror::Error;

//=== ClockError ==========================================================

/// Fatal clock failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    /// `min_update_time` is zero or exceeds `max_update_time`.
    #[error("invalid tick bounds: min {min:?}, max {max:?}")]
    InvalidBounds { min: Duration, max: Duration },

    /// The time source reported a time before the last emitted tick.
    ///
    /// No sane delta can be computed from a regressing clock, so the
    /// frame loop treats this as unrecoverable.
    #[error("clock regression: now {now:?} is before previous tick {previous:?}")]
    Regression { previous: Duration, now: Duration },
}

//=== TimeSource ==========================================================

/// Monotonic time source feeding the [`FrameClock`].
///
/// `now()` returns the time elapsed since an arbitrary, fixed origin.
pub trait TimeSource {
    fn now(&mut self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`].
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven time source.
///
/// Cloned handles share the same underlying time, so a test (or a
/// replay tool) can keep one handle and hand the other to the clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<Duration>>,
}

impl ManualTimeSource {
    pub fn new(start: Duration) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    /// Moves time forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    /// Sets the absolute time. May move backwards.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&mut self) -> Duration {
        self.now.get()
    }
}

//=== ClockTick ===========================================================

/// Result of polling the [`FrameClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// A tick was emitted. Always within `[min_update_time, max_update_time]`.
    Ready(Duration),

    /// Not enough time has passed. Sleep for `wait` and poll again.
    TooSoon { wait: Duration },
}

//=== FrameClock ==========================================================

/// Produces clamped frame ticks from a [`TimeSource`].
pub struct FrameClock {
    source: Box<dyn TimeSource>,
    previous: Duration,
    min_update_time: Duration,
    max_update_time: Duration,
}

impl FrameClock {
    //--- Construction -----------------------------------------------------

    /// Creates a clock primed so that the first poll emits a tick
    /// immediately instead of sleeping.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidBounds`] if `min_update_time` is zero
    /// or exceeds `max_update_time`.
    pub fn new(
        mut source: Box<dyn TimeSource>,
        min_update_time: Duration,
        max_update_time: Duration,
    ) -> Result<Self, ClockError> {
        if min_update_time.is_zero() || min_update_time > max_update_time {
            return Err(ClockError::InvalidBounds {
                min: min_update_time,
                max: max_update_time,
            });
        }

        let previous = source.now().saturating_sub(min_update_time);

        Ok(Self {
            source,
            previous,
            min_update_time,
            max_update_time,
        })
    }

    //--- Polling ----------------------------------------------------------

    /// Polls the time source.
    ///
    /// `previous` only moves when a tick is actually emitted, so time
    /// spent waiting accumulates into the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::Regression`] if the source went backwards.
    pub fn tick(&mut self) -> Result<ClockTick, ClockError> {
        let now = self.source.now();

        if now < self.previous {
            return Err(ClockError::Regression {
                previous: self.previous,
                now,
            });
        }

        let raw = now - self.previous;
        if raw < self.min_update_time {
            return Ok(ClockTick::TooSoon {
                wait: self.min_update_time - raw,
            });
        }

        self.previous = now;
        let tick = raw.min(self.max_update_time);
        trace!("Frame tick {:?} (raw {:?})", tick, raw);
        Ok(ClockTick::Ready(tick))
    }

    //--- Accessors --------------------------------------------------------

    pub fn min_update_time(&self) -> Duration {
        self.min_update_time
    }

    pub fn max_update_time(&self) -> Duration {
        self.max_update_time
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_millis(16);
    const MAX: Duration = Duration::from_millis(33);

    fn clock_at(start_ms: u64) -> (FrameClock, ManualTimeSource) {
        let time = ManualTimeSource::new(Duration::from_millis(start_ms));
        let clock = FrameClock::new(Box::new(time.clone()), MIN, MAX).unwrap();
        (clock, time)
    }

    //--- Priming ----------------------------------------------------------

    #[test]
    fn first_poll_emits_without_waiting() {
        let (mut clock, _time) = clock_at(1_000);
        assert_eq!(clock.tick(), Ok(ClockTick::Ready(MIN)));
    }

    #[test]
    fn priming_saturates_near_origin() {
        let (mut clock, time) = clock_at(5);
        // previous saturates to zero, so only 5ms have elapsed
        assert_eq!(
            clock.tick(),
            Ok(ClockTick::TooSoon { wait: Duration::from_millis(11) })
        );

        time.advance(Duration::from_millis(11));
        assert_eq!(clock.tick(), Ok(ClockTick::Ready(MIN)));
    }

    //--- Clamping ---------------------------------------------------------

    #[test]
    fn short_delta_asks_caller_to_wait() {
        let (mut clock, time) = clock_at(1_000);
        clock.tick().unwrap();

        time.advance(Duration::from_millis(10));
        assert_eq!(
            clock.tick(),
            Ok(ClockTick::TooSoon { wait: Duration::from_millis(6) })
        );
    }

    #[test]
    fn waiting_does_not_reset_the_reference_point() {
        let (mut clock, time) = clock_at(1_000);
        clock.tick().unwrap();

        time.advance(Duration::from_millis(10));
        assert!(matches!(clock.tick(), Ok(ClockTick::TooSoon { .. })));

        time.advance(Duration::from_millis(10));
        assert_eq!(clock.tick(), Ok(ClockTick::Ready(Duration::from_millis(20))));
    }

    #[test]
    fn long_stall_is_clamped_to_max() {
        let (mut clock, time) = clock_at(1_000);
        clock.tick().unwrap();

        time.advance(Duration::from_secs(5));
        assert_eq!(clock.tick(), Ok(ClockTick::Ready(MAX)));

        // The excess is dropped, not carried over
        time.advance(MIN);
        assert_eq!(clock.tick(), Ok(ClockTick::Ready(MIN)));
    }

    #[test]
    fn emitted_ticks_always_within_bounds() {
        let (mut clock, time) = clock_at(1_000);
        let steps = [1, 7, 16, 17, 25, 33, 34, 90, 3, 15, 16, 400];

        for ms in steps {
            time.advance(Duration::from_millis(ms));
            if let ClockTick::Ready(tick) = clock.tick().unwrap() {
                assert!(tick >= MIN && tick <= MAX, "tick {:?} out of bounds", tick);
            }
        }
    }

    //--- Regression -------------------------------------------------------

    #[test]
    fn backwards_time_is_fatal() {
        let (mut clock, time) = clock_at(1_000);
        clock.tick().unwrap();

        time.set(Duration::from_millis(500));
        assert_eq!(
            clock.tick(),
            Err(ClockError::Regression {
                previous: Duration::from_millis(1_000),
                now: Duration::from_millis(500),
            })
        );
    }

    //--- Construction -----------------------------------------------------

    #[test]
    fn zero_minimum_is_rejected() {
        let result = FrameClock::new(Box::new(ManualTimeSource::default()), Duration::ZERO, MAX);
        assert_eq!(
            result.err(),
            Some(ClockError::InvalidBounds { min: Duration::ZERO, max: MAX })
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result = FrameClock::new(Box::new(ManualTimeSource::default()), MAX, MIN);
        assert_eq!(result.err(), Some(ClockError::InvalidBounds { min: MAX, max: MIN }));
    }

    #[test]
    fn system_source_is_monotonic() {
        let mut source = SystemTimeSource::new();
        let a = source.now();
        let b = source.now();
        assert!(b >= a);
    }
}
