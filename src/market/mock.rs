//! Controllable mock quote source for testing.
//!
//! Lets tests choose the snapshot, inject failures, add latency, and hold
//! fetches at a gate so in-flight behavior can be observed deterministically.

use crate::error::QuoteError;
use crate::market::source::QuoteSource;
use crate::market::types::EventQuotes;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

/// Mock quote source with scripted behavior.
#[derive(Default)]
pub struct MockSource {
    rows: Mutex<Vec<EventQuotes>>,
    latency: Mutex<Duration>,
    fail: AtomicBool,
    gated: AtomicBool,
    gate: Notify,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a mock that returns an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given snapshot.
    pub fn with_rows(rows: Vec<EventQuotes>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    /// Replace the snapshot returned by subsequent fetches.
    pub fn set_snapshot(&self, rows: Vec<EventQuotes>) {
        *self.rows.lock().unwrap() = rows;
    }

    /// Toggle persistent fetch failure.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Add artificial latency to every fetch.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    /// Hold every fetch at a gate until released.
    pub fn hold_fetches(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Release one held fetch. A release with no fetch waiting is banked
    /// for the next one to arrive.
    pub fn release_one(&self) {
        self.gate.notify_one();
    }

    /// Stop gating new fetches and wake everything currently held.
    pub fn open_gate(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    /// Number of fetches that have reached the source.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    async fn fetch_snapshot(&self) -> Result<Vec<EventQuotes>, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }

        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(QuoteError::Unavailable {
                reason: "mock failure".to_string(),
            });
        }

        Ok(self.rows.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::types::{Category, EventDescriptor, Quote};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn sample_row() -> EventQuotes {
        EventQuotes {
            event: EventDescriptor::new("Bitcoin reaches $100k", Category::Bitcoin),
            polymarket: Quote::new(dec!(0.45), dec!(0.50)),
            opinion: Quote::new(dec!(0.48), dec!(0.55)),
        }
    }

    #[tokio::test]
    async fn returns_configured_snapshot() {
        let source = MockSource::with_rows(vec![sample_row()]);
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot, vec![sample_row()]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn failure_mode_returns_error() {
        let source = MockSource::with_rows(vec![sample_row()]);
        source.set_fail(true);
        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, QuoteError::Unavailable { .. }));

        source.set_fail(false);
        assert!(source.fetch_snapshot().await.is_ok());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn gated_fetch_waits_for_release() {
        let source = Arc::new(MockSource::with_rows(vec![sample_row()]));
        source.hold_fetches();

        let task = {
            let source = source.clone();
            tokio::spawn(async move { source.fetch_snapshot().await })
        };
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
        assert_eq!(source.calls(), 1);
        assert!(!task.is_finished());

        source.release_one();
        let snapshot = task.await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 1);
    }
}
