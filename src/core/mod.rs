//! Notification core: the one-shot cell and the broadcaster that fires it.
//!
//! Internal modules:
//! - [`signal`]: single-use, fan-out notification cell;
//! - [`broadcaster`]: registration set and broadcast under one lock.

mod broadcaster;
mod signal;

pub use broadcaster::Broadcaster;
pub use signal::Signal;
