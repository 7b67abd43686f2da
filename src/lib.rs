//! # herald
//!
//! **Herald** is a payload-free broadcast primitive for async Rust.
//!
//! One producing task wakes any number of waiting tasks exactly once per
//! broadcast; every waiter then registers again for the next one. On top of
//! that core sit a retriggerable [`Subscription`] and a timer-driven
//! [`Periodic`] broadcaster.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!    producer task(s)                               waiting task(s)
//!          │                                               │
//!          │ broadcast()                       register()  │
//!          ▼                                               ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Broadcaster                                                      │
//! │  - Mutex<Vec<Signal>>  (armed registrations)                      │
//! │  - broadcast: fire every Signal, clear the set (one critical sec.)│
//! └──────┬──────────────────────────────┬─────────────────────────────┘
//!        │ Signal (one-shot)            │ register() in a loop
//!        ▼                              ▼
//!   signal.await               ┌──────────────────────┐
//!                              │ Subscription         │
//!                              │  forwarder task      │
//!                              │  (re-registers,      │
//!                              │   hands off events)  │
//!                              └──────────┬───────────┘
//!                                         ▼
//!                              Notifications::recv()  (one event at a time)
//!
//! ┌──────────────────────────────┐
//! │ Periodic                     │   interval tick ──► broadcast()
//! │  Broadcaster + ticker task   │   close()       ──► final broadcast, stop
//! └──────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Signal:        armed ──(broadcast)──► fired            (never re-armed)
//! Subscription:  Active ──(stop / drop / parent token)──► Stopped  (terminal)
//! Periodic:      Active ──(close / drop / parent token)──► Closed  (terminal,
//!                                                           one final broadcast)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                  |
//! |-------------------|--------------------------------------------------------------|-------------------------------------|
//! | **Broadcast**     | Fire every outstanding one-shot registration at once.        | [`Broadcaster`], [`Signal`]         |
//! | **Subscriptions** | Continuously readable notifications without re-registering.  | [`Subscription`], [`Notifications`] |
//! | **Timer**         | Self-broadcasting on a fixed period.                         | [`Periodic`], [`PeriodicConfig`]    |
//! | **Capability**    | Wait on any source uniformly, always cancellable.            | [`Registrant`], [`Registration`]    |
//! | **Errors**        | Why a wait ended without an event.                           | [`NotifyError`]                     |
//!
//! ## Non-guarantees
//! - Notifications carry no data.
//! - A task not registered when a broadcast happens misses it for good.
//!
//! ## Logging
//! Background tasks report through [`tracing`] (`debug` on start/stop,
//! `trace` per broadcast). No subscriber is installed by this crate.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use herald::{Broadcaster, Registrant};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let b = Broadcaster::new();
//!
//!     // One-shot: register, then wait.
//!     let signal = b.register();
//!     b.broadcast();
//!     signal.await;
//!
//!     // Cancellable wait through the generic capability.
//!     let token = CancellationToken::new();
//!     let pending = b.register_until(&token);
//!     b.broadcast();
//!     assert!(pending.await.is_ok());
//!
//!     // Retriggerable: read as many events as are broadcast.
//!     let sub = b.subscribe(&token);
//!     let producer = b.clone();
//!     tokio::spawn(async move {
//!         loop {
//!             producer.broadcast();
//!             tokio::time::sleep(Duration::from_millis(5)).await;
//!         }
//!     });
//!     for _ in 0..3 {
//!         sub.next().await.unwrap();
//!     }
//!     sub.stop();
//! }
//! ```

mod core;
mod error;
mod periodic;
mod registrant;
mod subscription;

// ---- Public re-exports ----

pub use crate::core::{Broadcaster, Signal};
pub use error::NotifyError;
pub use periodic::{MissedTick, Periodic, PeriodicConfig};
pub use registrant::{Registrant, Registration};
pub use subscription::{Notifications, Subscription};
