//! # Periodic: a broadcaster driven by its own timer.
//!
//! [`Periodic`] owns a [`Broadcaster`] and a ticker task that broadcasts once
//! per period. External producers may broadcast too. Closing it performs one
//! last broadcast, so nobody registered at that moment is left waiting, and
//! then shuts the timer down.
//!
//! ## Architecture
//! ```text
//! Periodic::with_token(cfg, parent)
//!     └──► token = parent.child_token()
//!          tokio::spawn(tick(gate, period, token))
//!
//! tick loop {
//!   ├─► select (biased):
//!   │     ├─ token cancelled ─► exit
//!   │     └─ interval.tick() ─► gate.broadcast()
//!   └─► repeat
//! }
//! on exit: gate.close() ─► final broadcast (no-op if close() already did it)
//!
//! close():  gate.close()  ─► final broadcast + gate shut
//!           token.cancel() ─► ticker exits, child subscriptions stop
//! ```
//!
//! ## Rules
//! - **One broadcast per tick** while open.
//! - **Exactly one final broadcast** on close, whichever path closes it first
//!   (`close()`, drop, or cancellation of the parent token).
//! - **Nothing after close**: the gate rejects registrations and broadcasts
//!   with [`NotifyError::Closed`], the ticker included.
//! - **Lock order**: gate mutex, then broadcaster mutex.
//! - Subscriptions register on the inner broadcaster directly. A forwarder woken
//!   by the final broadcast may leave one stray registration behind before its
//!   token is cancelled; it is never fired and the subscription is closed.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::{Broadcaster, Signal};
use crate::error::NotifyError;
use crate::periodic::{MissedTick, PeriodicConfig};
use crate::registrant::{Registrant, Registration};
use crate::subscription::Subscription;

/// Broadcaster plus an open/closed flag.
///
/// Every operation checks the flag under its own lock, so a close cannot
/// interleave with a registration or a tick.
#[derive(Clone, Debug)]
struct Gate {
    broadcaster: Broadcaster,
    open: Arc<Mutex<bool>>,
}

impl Gate {
    fn new() -> Self {
        Self {
            broadcaster: Broadcaster::new(),
            open: Arc::new(Mutex::new(true)),
        }
    }

    fn register(&self) -> Result<Signal, NotifyError> {
        let open = self.open.lock();
        if !*open {
            return Err(NotifyError::Closed);
        }
        Ok(self.broadcaster.register())
    }

    fn broadcast(&self) -> Result<usize, NotifyError> {
        let open = self.open.lock();
        if !*open {
            return Err(NotifyError::Closed);
        }
        Ok(self.broadcaster.broadcast())
    }

    /// Shuts the gate with a final broadcast.
    ///
    /// Returns the number of signals fired, or `None` if it was already shut.
    fn close(&self) -> Option<usize> {
        let mut open = self.open.lock();
        if !*open {
            return None;
        }
        *open = false;
        Some(self.broadcaster.broadcast())
    }

    fn is_closed(&self) -> bool {
        !*self.open.lock()
    }
}

/// Broadcaster that broadcasts on its own every `period`.
///
/// ### Lifecycle
/// - **Active** from construction until [`close`](Self::close), drop, or
///   cancellation of the parent token.
/// - **Closed** is terminal: `register`/`broadcast`/`subscribe` return
///   [`NotifyError::Closed`].
///
/// ### Example
/// ```rust
/// use std::time::Duration;
/// use herald::Periodic;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let ticker = Periodic::new(Duration::from_millis(10));
///
///     let signal = ticker.register().expect("ticker is open");
///     signal.await; // woken by the next tick
///
///     let last = ticker.register().expect("ticker is open");
///     assert!(ticker.close());
///     assert!(last.is_fired());
///     assert!(ticker.register().is_err());
/// }
/// ```
#[derive(Debug)]
pub struct Periodic {
    gate: Gate,
    period: Duration,
    token: CancellationToken,
    ticker: Option<JoinHandle<()>>,
}

impl Periodic {
    /// Starts a periodic broadcaster with the given period and default settings.
    ///
    /// # Panics
    /// Must be called from within a tokio runtime (the ticker is spawned).
    pub fn new(period: Duration) -> Self {
        Self::with_config(PeriodicConfig::new(period))
    }

    /// Starts a periodic broadcaster from a configuration.
    pub fn with_config(cfg: PeriodicConfig) -> Self {
        Self::with_token(cfg, &CancellationToken::new())
    }

    /// Starts a periodic broadcaster that also closes when `parent` is cancelled.
    ///
    /// Cancelling `parent` has the same effect as [`close`](Self::close),
    /// including the final broadcast.
    pub fn with_token(cfg: PeriodicConfig, parent: &CancellationToken) -> Self {
        let token = parent.child_token();
        let gate = Gate::new();
        let period = cfg.period_clamped();

        let ticker = tokio::spawn(tick(gate.clone(), period, cfg.missed_tick, token.clone()));
        Self {
            gate,
            period,
            token,
            ticker: Some(ticker),
        }
    }

    /// Registers for the next broadcast (tick or external).
    ///
    /// Returns [`NotifyError::Closed`] after close.
    pub fn register(&self) -> Result<Signal, NotifyError> {
        self.gate.register()
    }

    /// Broadcasts immediately, in addition to the ticks.
    ///
    /// Returns the number of signals fired, or [`NotifyError::Closed`] after close.
    pub fn broadcast(&self) -> Result<usize, NotifyError> {
        self.gate.broadcast()
    }

    /// Starts a [`Subscription`] over this broadcaster.
    ///
    /// The subscription stops when this broadcaster closes.
    pub fn subscribe(&self) -> Result<Subscription, NotifyError> {
        if self.gate.is_closed() {
            return Err(NotifyError::Closed);
        }
        Ok(Subscription::new(&self.gate.broadcaster, &self.token))
    }

    /// Performs the final broadcast and stops the ticker.
    ///
    /// Returns `true` if this call closed the broadcaster, `false` if it was
    /// already closed (later calls are no-ops).
    pub fn close(&self) -> bool {
        let fired = self.gate.close();
        self.token.cancel();
        match fired {
            Some(fired) => {
                debug!(fired, "periodic broadcaster closed");
                true
            }
            None => false,
        }
    }

    /// Closes the broadcaster and waits for the ticker task to exit.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(h) = self.ticker.take() {
            let _ = h.await;
        }
    }

    /// Returns `true` once closed (by any path).
    pub fn is_closed(&self) -> bool {
        self.gate.is_closed()
    }

    /// Returns the effective (clamped) period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns the number of registrations waiting for the next broadcast.
    pub fn waiting(&self) -> usize {
        self.gate.broadcaster.waiting()
    }
}

impl Drop for Periodic {
    fn drop(&mut self) {
        self.close();
    }
}

impl Registrant for Periodic {
    fn register_until(&self, token: &CancellationToken) -> Registration {
        match self.register() {
            Ok(signal) => {
                let token = token.clone();
                async move { signal.fired_or(&token).await }.boxed()
            }
            Err(e) => future::ready(Err(e)).boxed(),
        }
    }
}

/// Ticker loop: one gate broadcast per interval tick until cancelled.
async fn tick(gate: Gate, period: Duration, missed: MissedTick, token: CancellationToken) {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(missed.into());
    debug!(?period, "periodic ticker started");

    let mut ticks: u64 = 0;
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        match gate.broadcast() {
            Ok(fired) => {
                ticks += 1;
                trace!(tick = ticks, fired, "periodic broadcast");
            }
            Err(_) => break,
        }
    }

    if let Some(fired) = gate.close() {
        debug!(fired, "periodic broadcaster closed by parent token");
    }
    debug!(ticks, "periodic ticker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_fires_every_period() {
        let period = Duration::from_millis(100);
        let p = Periodic::new(period);
        let start = Instant::now();

        for i in 1..=3u32 {
            let s = p.register().expect("open");
            s.await;
            let elapsed = start.elapsed();
            assert!(
                elapsed >= period * i && elapsed < period * i + period / 2,
                "tick {i} at {elapsed:?}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_tick_before_first_period() {
        let p = Periodic::new(Duration::from_millis(100));
        let s = p.register().expect("open");
        time::sleep(Duration::from_millis(60)).await;
        assert!(!s.is_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_fires_once_more_then_never() {
        let p = Periodic::new(Duration::from_millis(100));
        let s = p.register().expect("open");

        assert!(p.close());
        assert!(s.is_fired());
        assert!(p.is_closed());

        assert!(!p.close(), "second close is a no-op");
        assert_eq!(p.register().unwrap_err(), NotifyError::Closed);
        assert_eq!(p.broadcast(), Err(NotifyError::Closed));
        assert!(p.subscribe().is_err());

        let stray = p.gate.broadcaster.register();
        time::sleep(Duration::from_millis(500)).await;
        assert!(!stray.is_fired(), "no broadcast after close");
    }

    #[tokio::test]
    async fn test_parent_cancel_issues_final_broadcast() {
        let parent = CancellationToken::new();
        let p = Periodic::with_token(PeriodicConfig::new(Duration::from_secs(3600)), &parent);
        let s = p.register().expect("open");

        parent.cancel();
        timeout(Duration::from_secs(1), s)
            .await
            .expect("final broadcast missing");
        assert!(p.is_closed());
        assert!(!p.close());
    }

    #[tokio::test]
    async fn test_external_broadcast() {
        let p = Periodic::new(Duration::from_secs(3600));
        let s = p.register().expect("open");
        assert_eq!(p.broadcast(), Ok(1));
        assert!(s.is_fired());
        p.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscription_sees_ticks_and_stops_on_close() {
        let p = Periodic::new(Duration::from_millis(10));
        let sub = p.subscribe().expect("open");

        for _ in 0..3 {
            timeout(Duration::from_secs(1), sub.next())
                .await
                .expect("tick not delivered")
                .expect("subscription closed");
        }

        p.close();
        assert_eq!(sub.next().await, Err(NotifyError::Closed));
    }

    #[tokio::test]
    async fn test_subscription_woken_by_close_is_closed() {
        let p = Periodic::new(Duration::from_secs(3600));
        let sub = p.subscribe().expect("open");
        timeout(Duration::from_secs(1), async {
            while p.waiting() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("forwarder never registered");

        assert!(p.close());
        assert!(sub.is_stopped());
        assert_eq!(sub.next().await, Err(NotifyError::Closed));
        assert_eq!(p.broadcast(), Err(NotifyError::Closed));
    }

    #[tokio::test]
    async fn test_registrant_after_close() {
        let p = Periodic::new(Duration::from_secs(3600));
        let token = CancellationToken::new();

        let pending = p.register_until(&token);
        p.close();
        assert_eq!(pending.await, Ok(()));
        assert_eq!(p.register_until(&token).await, Err(NotifyError::Closed));
    }

    #[tokio::test]
    async fn test_zero_period_is_clamped() {
        let p = Periodic::new(Duration::ZERO);
        assert_eq!(p.period(), Duration::from_millis(1));
    }
}
