//! # Broadcaster: fan-out of payload-free, one-shot notifications.
//!
//! [`Broadcaster`] keeps a set of armed [`Signal`]s behind one mutex.
//! [`register`](Broadcaster::register) adds a signal, [`broadcast`](Broadcaster::broadcast)
//! fires and removes all of them in a single critical section.
//!
//! ## Architecture
//! ```text
//! Registrants (many):                     Producer (any task):
//!   task 1 ── register() ──┐
//!   task 2 ── register() ──┼──► Mutex<Vec<Signal>> ◄── broadcast()
//!   task N ── register() ──┘         │                   ├─ fire every signal
//!                                    │                   └─ clear the set
//!                                    ▼
//!                        each registrant: signal.await
//! ```
//!
//! ## Rules
//! - **One-shot**: a registration is consumed by the first broadcast after it;
//!   register again for the next one.
//! - **Happens-before**: a `register()` that returns before `broadcast()` starts
//!   is fired by it; a `register()` that starts after `broadcast()` returns waits
//!   for the next one. Racing calls may land on either side.
//! - **Fire under the lock**: a signal leaves the set in the same critical
//!   section that fires it, so no signal is ever fired twice.
//! - **Non-blocking**: neither operation waits for observers.
//! - **No redelivery**: nobody registered at broadcast time, nobody woken.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::core::signal::Signal;
use crate::subscription::Subscription;

/// Registration/notification engine.
///
/// Cheap to clone (internally holds an `Arc`); clones share one waiter set, so
/// producers and registrants can each keep their own copy.
///
/// ### Properties
/// - **Concurrency-safe**: every operation takes `&self`.
/// - **Unbounded**: registrations are never refused or back-pressured.
/// - **Fire-and-forget**: `broadcast()` returns without waiting for anyone.
#[derive(Clone, Debug, Default)]
pub struct Broadcaster {
    waiters: Arc<Mutex<Vec<Signal>>>,
}

impl Broadcaster {
    /// Creates a broadcaster with no registrations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers for the next broadcast and returns its armed signal.
    ///
    /// The returned signal fires exactly once. Waiting on it never returns if
    /// no broadcast ever happens, so long-lived waiters should pair it with a
    /// token via [`Signal::fired_or`].
    pub fn register(&self) -> Signal {
        let signal = Signal::armed();
        self.waiters.lock().push(signal.clone());
        signal
    }

    /// Fires every outstanding registration and clears the set.
    ///
    /// Returns the number of signals fired.
    pub fn broadcast(&self) -> usize {
        let mut waiters = self.waiters.lock();
        let fired = waiters.len();
        for signal in waiters.drain(..) {
            signal.fire();
        }
        drop(waiters);

        trace!(fired, "broadcast");
        fired
    }

    /// Returns the number of registrations waiting for the next broadcast.
    ///
    /// A snapshot: concurrent calls may change it right after it is read.
    pub fn waiting(&self) -> usize {
        self.waiters.lock().len()
    }

    /// Starts a [`Subscription`] over this broadcaster.
    ///
    /// Shorthand for [`Subscription::new`]; must be called inside a tokio runtime.
    pub fn subscribe(&self, parent: &CancellationToken) -> Subscription {
        Subscription::new(self, parent)
    }
}
