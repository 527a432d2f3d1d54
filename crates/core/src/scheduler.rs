//! Cancellable periodic ticks that drive the capture loop.
//!
//! Production code uses [`IntervalTicker`]; tests use [`ManualTicker`]
//! and step it by hand through a [`TickHandle`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Default capture cadence.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(150);

/// Source of capture ticks.
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick. `None` once the ticker is closed.
    async fn tick(&mut self) -> Option<Instant>;
}

/// Fixed-period ticker on the tokio timer.
///
/// Missed ticks are delayed rather than bursted, so a slow capture never
/// causes back-to-back ticks.
pub struct IntervalTicker {
    interval: tokio::time::Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> Option<Instant> {
        Some(self.interval.tick().await.into_std())
    }
}

/// Ticker that fires only when its [`TickHandle`] says so.
pub struct ManualTicker {
    rx: mpsc::UnboundedReceiver<Instant>,
}

/// Sending half of a [`ManualTicker`]. Dropping every handle closes the
/// ticker.
#[derive(Clone)]
pub struct TickHandle {
    tx: mpsc::UnboundedSender<Instant>,
}

/// Create a connected manual ticker and handle.
pub fn manual_ticker() -> (ManualTicker, TickHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTicker { rx }, TickHandle { tx })
}

impl TickHandle {
    /// Queue a tick stamped `at`. Returns `false` if the ticker is gone.
    pub fn tick_at(&self, at: Instant) -> bool {
        self.tx.send(at).is_ok()
    }

    /// Queue a tick stamped now.
    pub fn tick(&self) -> bool {
        self.tick_at(Instant::now())
    }
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> Option<Instant> {
        self.rx.recv().await
    }
}
