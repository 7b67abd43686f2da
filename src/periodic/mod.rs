//! Timer-driven broadcasting.
//!
//! ## Contents
//! - [`Periodic`] broadcaster that self-broadcasts every period and closes with a final broadcast
//! - [`PeriodicConfig`] period and missed-tick settings
//! - [`MissedTick`] catch-up strategy when ticks fall behind
//!
//! ## Defaults
//! - `period = 1s`, `missed_tick = MissedTick::Skip`.

mod config;
#[allow(clippy::module_inception)]
mod periodic;

pub use config::{MissedTick, PeriodicConfig};
pub use periodic::Periodic;
