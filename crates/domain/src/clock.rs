//! Time sources for the capability manager's activation throttle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};

/// Source of "current time" in seconds, read once per manager tick.
#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now_seconds(&self) -> f64;
}

/// Game clock - accumulated frame time, advanced by the host world.
#[derive(Debug, Default)]
pub struct GameClock {
    seconds_bits: AtomicU64,
}

impl GameClock {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    pub fn starting_at(seconds: f64) -> Self {
        Self {
            seconds_bits: AtomicU64::new(seconds.to_bits()),
        }
    }

    /// Advance game time by one frame's delta.
    pub fn advance(&self, delta_seconds: f32) {
        let next = self.now_seconds() + f64::from(delta_seconds);
        self.seconds_bits.store(next.to_bits(), Ordering::Relaxed);
    }

    pub fn set(&self, seconds: f64) {
        self.seconds_bits.store(seconds.to_bits(), Ordering::Relaxed);
    }
}

impl ClockPort for GameClock {
    fn now_seconds(&self) -> f64 {
        f64::from_bits(self.seconds_bits.load(Ordering::Relaxed))
    }
}

/// System clock - real time elapsed since construction.
///
/// Elapsed time is monotonic; `started_at` is only the wall-clock timestamp
/// of construction, for reporting.
#[derive(Debug, Clone)]
pub struct SystemClock {
    started_at: DateTime<Utc>,
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            origin: Instant::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_clock_accumulates_frame_deltas() {
        let clock = GameClock::new();
        assert_eq!(clock.now_seconds(), 0.0);

        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.now_seconds() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn game_clock_can_be_set() {
        let clock = GameClock::starting_at(10.0);
        assert_eq!(clock.now_seconds(), 10.0);

        clock.set(2.0);
        assert_eq!(clock.now_seconds(), 2.0);
    }

    #[test]
    fn system_clock_starts_near_zero_and_never_goes_backwards() {
        let clock = SystemClock::new();
        let first = clock.now_seconds();
        let second = clock.now_seconds();
        assert!(first >= 0.0);
        assert!(first < 5.0);
        assert!(second >= first);
    }

    #[test]
    fn system_clock_records_construction_time() {
        let before = Utc::now();
        let clock = SystemClock::new();
        assert!(clock.started_at() >= before);
        assert!(clock.started_at() <= Utc::now());
    }
}
