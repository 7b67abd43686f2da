//! # Example: ticker
//!
//! Demonstrates a [`Periodic`] broadcaster feeding several kinds of waiters.
//!
//! Shows how to:
//! - Read ticks through a [`Subscription`] without re-registering
//! - Wait for one tick through the generic [`Registrant`] capability
//! - Close the ticker so nobody is left waiting
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Periodic::with_config(period = 200ms)
//!   ├─► reader task: subscription.next() x5
//!   ├─► one-shot waiter: register_until(token)
//!   └─► close()
//!         ├─► final broadcast
//!         └─► subscription stops, reader sees Closed
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=herald=trace cargo run --example ticker
//! ```

use std::time::Duration;

use herald::{MissedTick, NotifyError, Periodic, PeriodicConfig, Registrant};
use tokio_util::sync::CancellationToken;
use tracing::info;

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("herald=debug,ticker=info")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // 1. Configure and start the ticker
    let cfg = PeriodicConfig {
        period: Duration::from_millis(200),
        missed_tick: MissedTick::Delay,
    };
    let ticker = Periodic::with_config(cfg);

    // 2. Reader: a subscription keeps delivering ticks
    let sub = ticker.subscribe()?;
    let reader = tokio::spawn(async move {
        let mut seen = 0u32;
        loop {
            match sub.next().await {
                Ok(()) => {
                    seen += 1;
                    info!(seen, "tick");
                }
                Err(NotifyError::Closed) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(seen)
    });

    // 3. One-shot waiter through the generic capability
    let token = CancellationToken::new();
    ticker.register_until(&token).await?;
    info!("one-shot waiter woken");

    // 4. Let a few more ticks go by, then close
    tokio::time::sleep(Duration::from_millis(900)).await;
    let pending = ticker.register()?;
    ticker.close();
    pending.await;
    info!("final broadcast observed");

    let seen = reader.await??;
    info!(seen, "reader finished");
    Ok(())
}
