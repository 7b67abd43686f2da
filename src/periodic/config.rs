//! # Periodic broadcaster configuration.
//!
//! Provides [`PeriodicConfig`], the settings of a [`Periodic`](crate::Periodic)
//! broadcaster, and [`MissedTick`], what to do when ticks fall behind.
//!
//! ## Sentinel values
//! - `period` below 1ms (including `0s`) → clamped to 1ms by [`PeriodicConfig::period_clamped`]

use std::time::Duration;

use tokio::time::MissedTickBehavior;

/// Smallest period the ticker accepts.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Behavior of the ticker when broadcasts fall behind schedule
/// (e.g. the runtime was busy for several periods).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissedTick {
    /// Fire every missed tick back to back until caught up.
    Burst,
    /// Fire once now, then keep `period` spacing from this point.
    Delay,
    /// Fire once now, then resume on the original schedule (default).
    #[default]
    Skip,
}

impl From<MissedTick> for MissedTickBehavior {
    fn from(value: MissedTick) -> Self {
        match value {
            MissedTick::Burst => MissedTickBehavior::Burst,
            MissedTick::Delay => MissedTickBehavior::Delay,
            MissedTick::Skip => MissedTickBehavior::Skip,
        }
    }
}

/// Settings for a periodic broadcaster.
///
/// ## Field semantics
/// - `period`: time between automatic broadcasts; the first one happens one
///   full period after construction
/// - `missed_tick`: catch-up strategy for late ticks
#[derive(Clone, Debug)]
pub struct PeriodicConfig {
    /// Time between automatic broadcasts.
    pub period: Duration,

    /// What to do when ticks are missed.
    pub missed_tick: MissedTick,
}

impl PeriodicConfig {
    /// Creates a configuration with the given period and default tick handling.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }

    /// Returns the period clamped to a minimum of 1ms.
    ///
    /// The ticker uses this value; a zero-length interval is invalid.
    #[inline]
    pub fn period_clamped(&self) -> Duration {
        self.period.max(MIN_PERIOD)
    }
}

impl Default for PeriodicConfig {
    /// Default configuration:
    ///
    /// - `period = 1s`
    /// - `missed_tick = MissedTick::Skip` (a slow runtime does not cause a burst of broadcasts)
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            missed_tick: MissedTick::default(),
        }
    }
}
