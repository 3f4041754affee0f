//! Fixed-rate admission gate.
//!
//! Raw touch streams can run at several hundred frames per second, far more
//! pointer updates than a host needs.  `RateGate` admits at most one tick per
//! interval and drops the rest; nothing is queued.  State keeps accumulating
//! between admitted ticks, so the next admitted tick always sees the newest
//! position.

use std::time::{Duration, Instant};

/// Default actuation interval (~60 Hz).
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

/// Admits one tick per `interval`, measured on the monotonic clock.
#[derive(Debug, Clone)]
pub struct RateGate {
    interval: Duration,
    /// `None` until the first admission when built with [`RateGate::primed`].
    last_fired: Option<Instant>,
}

impl RateGate {
    /// Creates a gate whose clock starts now: the first admission happens
    /// once `interval` has passed since construction.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: Some(Instant::now()),
        }
    }

    /// Creates a gate from a millisecond interval.
    ///
    /// Negative or NaN intervals are treated as zero (admit every tick);
    /// intervals too large for a [`Duration`] saturate.
    pub fn from_millis(interval_ms: f64) -> Self {
        Self::new(millis_to_duration(interval_ms))
    }

    /// Creates a gate that admits the very first tick immediately.
    pub fn primed(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    /// The configured interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Samples the monotonic clock and reports whether a tick is admitted.
    ///
    /// On `true` the stored timestamp moves to now; on `false` it is left
    /// untouched.
    pub fn has_elapsed(&mut self) -> bool {
        self.has_elapsed_at(Instant::now())
    }

    /// Same as [`RateGate::has_elapsed`] with an explicit clock sample.
    pub fn has_elapsed_at(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_fired {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

/// Converts a millisecond interval to a [`Duration`].
///
/// Negative and NaN values mean "no throttling"; values too large for a
/// `Duration` saturate.
pub fn millis_to_duration(interval_ms: f64) -> Duration {
    if interval_ms.is_nan() || interval_ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(interval_ms / 1000.0).unwrap_or(Duration::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
