//! # One-shot notification cell.
//!
//! A [`Signal`] is what a [`Broadcaster`](crate::Broadcaster) hands out on
//! registration. It starts **armed** and transitions to **fired** exactly once;
//! every clone observes the same transition, so one firing fans out to any
//! number of waiters.
//!
//! ## Rules
//! - Only the issuing broadcaster can fire a signal (`fire` is crate-private
//!   and consumes the broadcaster's copy).
//! - A fired signal never re-arms. Register again for the next event.
//! - Dropping an unobserved signal is fine; nothing is leaked on the firing side.
//!
//! ```text
//! armed ──(broadcast)──► fired
//!   │                      └─► every clone: fired().await returns
//!   └─ dropped unobserved: no effect
//! ```

use std::future::IntoFuture;

use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::error::NotifyError;

/// Single-use, payload-free notification cell.
///
/// Backed by a [`CancellationToken`] used as an atomically closed gate.
/// Cheap to clone; clones share the same state.
///
/// A signal can be awaited directly:
/// ```
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// use herald::Broadcaster;
///
/// let b = Broadcaster::new();
/// let signal = b.register();
/// b.broadcast();
/// signal.await;
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Signal {
    gate: CancellationToken,
}

impl Signal {
    /// Creates a new armed signal.
    pub(crate) fn armed() -> Self {
        Self {
            gate: CancellationToken::new(),
        }
    }

    /// Fires the signal, waking every clone.
    ///
    /// Callers own the only copy allowed to fire; a second firing is a bug in
    /// the broadcaster's lock discipline.
    pub(crate) fn fire(self) {
        debug_assert!(!self.gate.is_cancelled(), "signal fired twice");
        self.gate.cancel();
    }

    /// Returns `true` once the signal has fired.
    #[inline]
    pub fn is_fired(&self) -> bool {
        self.gate.is_cancelled()
    }

    /// Waits until the signal fires.
    ///
    /// Returns immediately if it already has. Never returns if the issuing
    /// broadcaster is dropped without broadcasting; prefer [`Signal::fired_or`].
    pub async fn fired(&self) {
        self.gate.cancelled().await
    }

    /// Waits until the signal fires or `token` is cancelled, whichever comes first.
    ///
    /// Cancellation wins when both are ready.
    pub async fn fired_or(&self, token: &CancellationToken) -> Result<(), NotifyError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(NotifyError::Cancelled),
            _ = self.gate.cancelled() => Ok(()),
        }
    }
}

impl IntoFuture for Signal {
    type Output = ();
    type IntoFuture = WaitForCancellationFutureOwned;

    fn into_future(self) -> Self::IntoFuture {
        self.gate.cancelled_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_starts_armed() {
        let s = Signal::armed();
        assert!(!s.is_fired());
    }

    #[tokio::test]
    async fn test_fire_wakes_every_clone() {
        let s = Signal::armed();
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let c = s.clone();
                tokio::spawn(async move { c.fired().await })
            })
            .collect();

        let observer = s.clone();
        s.fire();
        assert!(observer.is_fired());

        for w in waiters {
            timeout(Duration::from_secs(1), w)
                .await
                .expect("waiter not woken")
                .expect("waiter panicked");
        }
    }

    #[tokio::test]
    async fn test_fired_or_cancelled() {
        let s = Signal::armed();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(s.fired_or(&token).await, Err(NotifyError::Cancelled));
    }

    #[tokio::test]
    async fn test_fired_or_prefers_cancellation() {
        let s = Signal::armed();
        let observer = s.clone();
        s.fire();

        let token = CancellationToken::new();
        assert_eq!(observer.fired_or(&token).await, Ok(()));
        token.cancel();
        assert_eq!(observer.fired_or(&token).await, Err(NotifyError::Cancelled));
    }

    #[tokio::test]
    async fn test_await_directly() {
        let s = Signal::armed();
        let observer = s.clone();
        s.fire();
        timeout(Duration::from_millis(100), observer)
            .await
            .expect("fired signal should resolve");
    }
}
