// Facility Sim - Tick clock
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Tick timestamps.
//!
//! Time is a float number of seconds. Callers either drive ticks with their
//! own timestamps (backfill, tests) or let the model read the wall clock.

use crate::error::{Result, SimulationError};
use chrono::Utc;

/// Timestamps of the tick being computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Current tick time in seconds.
    pub now: f64,
    /// Previous tick time, `None` on the first tick.
    pub previous: Option<f64>,
}

impl Tick {
    /// Seconds since the previous tick (0 on the first tick).
    pub fn elapsed(&self) -> f64 {
        self.previous.map_or(0.0, |previous| self.now - previous)
    }
}

/// Tracks the last tick time and hands out [`Tick`]s.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    time: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last tick.
    pub fn time(&self) -> Option<f64> {
        self.time
    }

    /// Advance to a caller-supplied time or the wall clock.
    ///
    /// Supplied times must be finite and non-decreasing. Wall-clock time is
    /// clamped so it never runs backwards.
    pub fn advance(&mut self, current_time: Option<f64>) -> Result<Tick> {
        let previous = self.time;
        let now = match current_time {
            Some(t) => {
                if !t.is_finite() || previous.map_or(false, |p| t < p) {
                    return Err(SimulationError::InvalidTime {
                        previous,
                        current: t,
                    });
                }
                t
            }
            None => {
                let wall = wall_clock_seconds();
                previous.map_or(wall, |p| wall.max(p))
            }
        };
        self.time = Some(now);
        Ok(Tick { now, previous })
    }
}

/// Current UTC time in seconds since the Unix epoch.
pub fn wall_clock_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_has_no_elapsed() {
        let mut clock = Clock::new();
        let tick = clock.advance(Some(100.0)).unwrap();
        assert_eq!(tick.previous, None);
        assert_eq!(tick.elapsed(), 0.0);
    }

    #[test]
    fn test_elapsed() {
        let mut clock = Clock::new();
        clock.advance(Some(100.0)).unwrap();
        let tick = clock.advance(Some(105.0)).unwrap();
        assert_eq!(tick.elapsed(), 5.0);
        assert_eq!(clock.time(), Some(105.0));
    }

    #[test]
    fn test_same_time_allowed() {
        let mut clock = Clock::new();
        clock.advance(Some(10.0)).unwrap();
        assert_eq!(clock.advance(Some(10.0)).unwrap().elapsed(), 0.0);
    }

    #[test]
    fn test_backwards_time_rejected() {
        let mut clock = Clock::new();
        clock.advance(Some(10.0)).unwrap();
        let err = clock.advance(Some(9.0)).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidTime { .. }));
        // state unchanged
        assert_eq!(clock.time(), Some(10.0));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut clock = Clock::new();
        assert!(clock.advance(Some(f64::NAN)).is_err());
        assert!(clock.advance(Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_wall_clock_never_backwards() {
        let mut clock = Clock::new();
        let far_future = wall_clock_seconds() + 1e9;
        clock.advance(Some(far_future)).unwrap();
        let tick = clock.advance(None).unwrap();
        assert_eq!(tick.now, far_future);
    }
}
