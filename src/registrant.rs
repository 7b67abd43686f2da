//! # Registration capability shared by every notification source.
//!
//! Provides [`Registrant`], which lets generic code wait for "the next event"
//! without knowing whether a [`Broadcaster`], a [`Subscription`](crate::Subscription)
//! or a [`Periodic`](crate::Periodic) backs it.
//!
//! ## Rules
//! - **Eager registration**: the registration is taken inside
//!   [`Registrant::register_until`]; only the waiting is deferred into the
//!   returned [`Registration`]. An event that happens between the call and the
//!   first poll is still observed.
//! - **Mandatory token**: every wait can be abandoned by the caller, so a
//!   source that never fires again cannot strand it.
//!
//! ## Example
//! ```rust
//! use herald::{Broadcaster, NotifyError, Registrant};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn wait_next(source: &dyn Registrant, token: &CancellationToken) -> Result<(), NotifyError> {
//!     source.register_until(token).await
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let b = Broadcaster::new();
//!     let token = CancellationToken::new();
//!
//!     let pending = b.register_until(&token);
//!     b.broadcast();
//!     assert_eq!(pending.await, Ok(()));
//!
//!     token.cancel();
//!     assert_eq!(wait_next(&b, &token).await, Err(NotifyError::Cancelled));
//! }
//! ```

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::core::Broadcaster;
use crate::error::NotifyError;

/// Pending wait for the next event of a [`Registrant`].
///
/// Resolves to:
/// - `Ok(())` when the event arrives,
/// - `Err(NotifyError::Cancelled)` when the caller's token fires first,
/// - `Err(NotifyError::Closed)` when the source is stopped/closed.
pub type Registration = BoxFuture<'static, Result<(), NotifyError>>;

/// Something a task can register with to be woken by its next event.
///
/// One-shot sources (`Broadcaster`, `Periodic`) issue a fresh registration on
/// every call; retriggerable sources (`Subscription`) hand out their single
/// output handle, which may deliver many times.
pub trait Registrant: Send + Sync {
    /// Registers for the next event and returns the pending wait.
    ///
    /// The wait ends early with [`NotifyError::Cancelled`] once `token` is cancelled.
    fn register_until(&self, token: &CancellationToken) -> Registration;
}

impl Registrant for Broadcaster {
    fn register_until(&self, token: &CancellationToken) -> Registration {
        let signal = self.register();
        let token = token.clone();
        async move { signal.fired_or(&token).await }.boxed()
    }
}

impl<R: Registrant + ?Sized> Registrant for Arc<R> {
    fn register_until(&self, token: &CancellationToken) -> Registration {
        (**self).register_until(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn next_event(source: &dyn Registrant, token: &CancellationToken) -> Result<(), NotifyError> {
        source.register_until(token).await
    }

    #[tokio::test]
    async fn test_registration_is_eager() {
        let b = Broadcaster::new();
        let token = CancellationToken::new();

        let pending = b.register_until(&token);
        assert_eq!(b.waiting(), 1);
        b.broadcast();

        let res = timeout(Duration::from_millis(100), pending)
            .await
            .expect("registration should already be fired");
        assert_eq!(res, Ok(()));
    }

    #[tokio::test]
    async fn test_cancelled_token_ends_wait() {
        let b = Broadcaster::new();
        let token = CancellationToken::new();

        let pending = b.register_until(&token);
        token.cancel();
        assert_eq!(pending.await, Err(NotifyError::Cancelled));
    }

    #[tokio::test]
    async fn test_dyn_and_arc_sources() {
        let b = Arc::new(Broadcaster::new());
        let token = CancellationToken::new();

        let producer = Arc::clone(&b);
        let waiter = {
            let b = Arc::clone(&b);
            let token = token.clone();
            tokio::spawn(async move { next_event(&b, &token).await })
        };

        while b.waiting() == 0 {
            tokio::task::yield_now().await;
        }
        producer.broadcast();

        let res = timeout(Duration::from_secs(1), waiter)
            .await
            .expect("timed out")
            .expect("join");
        assert_eq!(res, Ok(()));
    }
}
