//! Retriggerable subscriptions over a [`Broadcaster`](crate::Broadcaster).
//!
//! ## Contents
//! - [`Subscription`] owns the forwarder task and its cancellation token
//! - [`Notifications`] the output handle consumers read repeatedly

mod notifications;
#[allow(clippy::module_inception)]
mod subscription;

pub use notifications::Notifications;
pub use subscription::Subscription;
