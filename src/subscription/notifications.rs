//! # Output handle of a subscription.
//!
//! [`Notifications`] is the continuously readable side of a
//! [`Subscription`](crate::Subscription). Every clone shares one capacity-1
//! queue and the subscription's closed gate.
//!
//! ## Rules
//! - At most **one** unclaimed event is held; the forwarder waits until it is read.
//! - Each event is consumed by exactly one reader, even with many clones.
//! - Once the subscription stops, every read (pending or future) returns
//!   [`NotifyError::Closed`] immediately; a still-queued event is discarded.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::error::NotifyError;

/// Continuously readable notification stream of one subscription.
#[derive(Clone, Debug)]
pub struct Notifications {
    rx: Arc<Mutex<mpsc::Receiver<()>>>,
    closed: CancellationToken,
}

impl Notifications {
    pub(crate) fn new(rx: mpsc::Receiver<()>, closed: CancellationToken) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
            closed,
        }
    }

    /// Waits for the next event.
    ///
    /// Returns [`NotifyError::Closed`] once the subscription is stopped,
    /// including for readers that were already waiting.
    pub async fn recv(&self) -> Result<(), NotifyError> {
        if self.closed.is_cancelled() {
            return Err(NotifyError::Closed);
        }
        let mut rx = tokio::select! {
            biased;
            _ = self.closed.cancelled() => return Err(NotifyError::Closed),
            rx = self.rx.lock() => rx,
        };
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(NotifyError::Closed),
            ev = rx.recv() => ev.ok_or(NotifyError::Closed),
        }
    }

    /// Waits for the next event, giving up with [`NotifyError::Cancelled`] once `token` fires.
    pub async fn recv_or(&self, token: &CancellationToken) -> Result<(), NotifyError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(NotifyError::Cancelled),
            res = self.recv() => res,
        }
    }

    /// Consumes a pending event without waiting; `Ok(false)` while another clone is reading.
    ///
    /// Returns `Ok(true)` if an event was consumed. Returns `Ok(false)` if none
    /// is pending, and also when another clone holds the queue (a blocked
    /// [`recv`](Self::recv), for instance) even if an event is pending.
    pub fn try_recv(&self) -> Result<bool, NotifyError> {
        if self.closed.is_cancelled() {
            return Err(NotifyError::Closed);
        }
        let Ok(mut rx) = self.rx.try_lock() else {
            return Ok(false);
        };
        match rx.try_recv() {
            Ok(()) => Ok(true),
            Err(mpsc::error::TryRecvError::Empty) => Ok(false),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(NotifyError::Closed),
        }
    }

    /// Returns `true` once the owning subscription has stopped.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn pair() -> (mpsc::Sender<()>, Notifications, CancellationToken) {
        let (tx, rx) = mpsc::channel(1);
        let closed = CancellationToken::new();
        (tx, Notifications::new(rx, closed.clone()), closed)
    }

    #[tokio::test]
    async fn test_each_event_read_once() {
        let (tx, n, _closed) = pair();
        let other = n.clone();

        tx.send(()).await.expect("send");
        assert_eq!(n.recv().await, Ok(()));
        assert_eq!(other.try_recv(), Ok(false));
    }

    #[tokio::test]
    async fn test_holds_one_unclaimed_event() {
        let (tx, n, _closed) = pair();
        tx.try_send(()).expect("first event fits");
        assert!(tx.try_send(()).is_err(), "second event must wait");
        assert_eq!(n.try_recv(), Ok(true));
        assert!(tx.try_send(()).is_ok());
    }

    #[tokio::test]
    async fn test_try_recv_yields_while_queue_held() {
        let (tx, n, _closed) = pair();
        let other = n.clone();
        tx.try_send(()).expect("send");

        let guard = n.rx.lock().await;
        assert_eq!(other.try_recv(), Ok(false));
        drop(guard);
        assert_eq!(other.try_recv(), Ok(true));
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_reader() {
        let (_tx, n, closed) = pair();
        let reader = {
            let n = n.clone();
            tokio::spawn(async move { n.recv().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        closed.cancel();

        let res = timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader still blocked")
            .expect("join");
        assert_eq!(res, Err(NotifyError::Closed));
        assert!(n.is_closed());
        assert_eq!(n.try_recv(), Err(NotifyError::Closed));
    }

    #[tokio::test]
    async fn test_sender_dropped_means_closed() {
        let (tx, n, _closed) = pair();
        drop(tx);
        assert_eq!(n.recv().await, Err(NotifyError::Closed));
    }

    #[tokio::test]
    async fn test_recv_or_cancelled() {
        let (_tx, n, _closed) = pair();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(n.recv_or(&token).await, Err(NotifyError::Cancelled));
    }
}
