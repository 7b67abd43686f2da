//! # Subscription: retriggerable notifications over a broadcaster.
//!
//! A [`Subscription`] hides the "register again after every event" protocol of
//! [`Broadcaster`]. A background forwarder keeps re-registering and republishes
//! each broadcast onto one [`Notifications`] handle that consumers read repeatedly.
//!
//! ## Architecture
//! ```text
//! Subscription::new(broadcaster, parent)
//!     └──► child token = parent.child_token()
//!          tokio::spawn(forward(...))
//!
//! forward loop {
//!   ├─► select (biased):
//!   │     ├─ token cancelled ─► exit
//!   │     └─ tx.reserve()    ─► slot free: previous event was read
//!   ├─► signal = broadcaster.register()
//!   ├─► select (biased):
//!   │     ├─ token cancelled ─► drop permit, exit
//!   │     └─ signal fired    ─► permit.send(()) ─► Notifications::recv()
//!   └─► repeat
//! }
//! on exit: sender dropped, Notifications permanently closed
//! ```
//!
//! ## Rules
//! - Events are forwarded in broadcast order and never duplicated.
//! - Rendezvous: at most one unclaimed event. The forwarder does not register
//!   again until a reader has taken the previous event, so broadcasts landing
//!   while an event is unread (or between "signal fired" and the next
//!   `register()`) are missed. That loss is accepted.
//! - Cancellation wins at every suspension point.
//! - `stop` consumes the subscription; dropping it stops it too.

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::Broadcaster;
use crate::error::NotifyError;
use crate::registrant::{Registrant, Registration};
use crate::subscription::Notifications;

/// Why a forwarder loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForwarderExit {
    /// Subscription token cancelled (stop, drop, or parent cancelled).
    Cancelled,
    /// Every `Notifications` handle is gone.
    Disconnected,
}

/// Continuously retriggerable view of a [`Broadcaster`].
///
/// ### Lifecycle
/// - **Active** from [`Subscription::new`] until [`stop`](Self::stop),
///   [`shutdown`](Self::shutdown), drop, or cancellation of the parent token.
/// - **Stopped** is terminal: the output handle is closed for good.
///
/// ### Example
/// ```rust
/// use herald::Broadcaster;
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let b = Broadcaster::new();
///     let sub = b.subscribe(&CancellationToken::new());
///     let events = sub.register();
///
///     let producer = b.clone();
///     tokio::spawn(async move {
///         loop {
///             producer.broadcast();
///             tokio::time::sleep(std::time::Duration::from_millis(5)).await;
///         }
///     });
///
///     events.recv().await.unwrap();
///     sub.stop();
///     assert!(events.recv().await.is_err());
/// }
/// ```
#[derive(Debug)]
pub struct Subscription {
    token: CancellationToken,
    output: Notifications,
    forwarder: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Subscribes to `source` and spawns the forwarder task.
    ///
    /// The subscription stops on its own when `parent` is cancelled.
    ///
    /// # Panics
    /// Must be called from within a tokio runtime (the forwarder is spawned).
    pub fn new(source: &Broadcaster, parent: &CancellationToken) -> Self {
        let token = parent.child_token();
        let (tx, rx) = mpsc::channel::<()>(1);
        let output = Notifications::new(rx, token.clone());

        let forwarder = tokio::spawn(forward(source.clone(), tx, token.clone()));
        Self {
            token,
            output,
            forwarder: Some(forwarder),
        }
    }

    /// Returns the output handle.
    ///
    /// Every call returns a clone of the same handle; it delivers one event at
    /// a time for as long as the subscription is active.
    pub fn register(&self) -> Notifications {
        self.output.clone()
    }

    /// Waits for the next forwarded event.
    ///
    /// Returns [`NotifyError::Closed`] once the subscription has stopped.
    pub async fn next(&self) -> Result<(), NotifyError> {
        self.output.recv().await
    }

    /// Returns `true` once the subscription has stopped (by any path).
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stops forwarding and closes the output handle.
    ///
    /// Readers blocked on the handle are released with [`NotifyError::Closed`].
    /// Returns without waiting for the forwarder; use [`shutdown`](Self::shutdown) to wait.
    pub fn stop(self) {
        self.token.cancel();
    }

    /// Stops forwarding and waits for the forwarder task to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(h) = self.forwarder.take() {
            let _ = h.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl Registrant for Subscription {
    fn register_until(&self, token: &CancellationToken) -> Registration {
        let output = self.register();
        let token = token.clone();
        async move { output.recv_or(&token).await }.boxed()
    }
}

/// Forwarder loop: wait for a free slot, re-register, wait, hand off, until cancelled.
async fn forward(source: Broadcaster, tx: mpsc::Sender<()>, token: CancellationToken) {
    debug!("subscription forwarder started");
    let mut forwarded: u64 = 0;

    let exit = loop {
        // The slot frees only once a reader has taken the previous event.
        let permit = tokio::select! {
            biased;
            _ = token.cancelled() => break ForwarderExit::Cancelled,
            res = tx.reserve() => match res {
                Ok(permit) => permit,
                Err(_) => break ForwarderExit::Disconnected,
            },
        };

        let signal = source.register();
        tokio::select! {
            biased;
            _ = token.cancelled() => break ForwarderExit::Cancelled,
            _ = signal.fired() => {}
        }
        permit.send(());
        forwarded += 1;
    };

    debug!(forwarded, reason = ?exit, "subscription forwarder stopped");
}
