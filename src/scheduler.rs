//! Refresh scheduling for the arbitrage pipeline.
//!
//! One scheduler owns the fetch-scan-publish cycle. A compare-and-swap flag
//! guarantees at most one fetch in flight; triggers arriving while one runs
//! are dropped, not queued. The auto-refresh timer is a cancellable task that
//! holds only a weak reference to the scheduler core.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::arbitrage::detector::scan_snapshot;
use crate::config::Config;
use crate::error::{QuoteError, ScannerError};
use crate::market::source::QuoteSource;
use crate::metrics;
use crate::store::OpportunityStore;

/// Summary of one completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Snapshot rows fetched.
    pub rows: usize,
    /// Opportunities published.
    pub opportunities: usize,
    /// Rows rejected for degenerate quotes.
    pub degenerate_quotes: usize,
}

/// Handle to the refresh pipeline. Cheap to clone.
#[derive(Clone)]
pub struct RefreshScheduler {
    core: Arc<SchedulerCore>,
}

struct SchedulerCore {
    source: Arc<dyn QuoteSource>,
    store: Arc<OpportunityStore>,
    refresh_interval: Duration,
    fetch_timeout: Duration,
    threshold: Decimal,
    auto_on_start: bool,
    fetching: AtomicBool,
    auto_enabled: AtomicBool,
    last_updated: RwLock<Option<OffsetDateTime>>,
    last_error: RwLock<Option<String>>,
    timer_task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Wire a scheduler to a quote source and a store.
    pub fn new(
        source: Arc<dyn QuoteSource>,
        store: Arc<OpportunityStore>,
        config: &Config,
    ) -> Self {
        Self {
            core: Arc::new(SchedulerCore {
                source,
                store,
                refresh_interval: config.refresh_interval(),
                fetch_timeout: config.fetch_timeout(),
                threshold: config.profit_threshold,
                auto_on_start: config.auto_refresh,
                fetching: AtomicBool::new(false),
                auto_enabled: AtomicBool::new(false),
                last_updated: RwLock::new(None),
                last_error: RwLock::new(None),
                timer_task: Mutex::new(None),
            }),
        }
    }

    /// Kick the initial refresh and arm auto-refresh when configured.
    pub fn start(&self) {
        self.core.try_trigger();
        if self.core.auto_on_start {
            self.set_auto_refresh(true);
        }
    }

    /// Request a refresh in the background.
    ///
    /// Returns false when one is already in flight; the request is dropped.
    pub fn trigger(&self) -> bool {
        self.core.try_trigger()
    }

    /// Run one refresh inline and wait for its result.
    ///
    /// Fails fast with [`ScannerError::AlreadyRefreshing`] instead of
    /// queueing behind an in-flight fetch.
    pub async fn refresh_now(&self) -> Result<RefreshReport, ScannerError> {
        if self
            .core
            .fetching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ScannerError::AlreadyRefreshing);
        }
        let result = self.core.run_cycle().await;
        self.core.fetching.store(false, Ordering::SeqCst);
        Ok(result?)
    }

    /// Enable or disable the auto-refresh timer.
    ///
    /// Enabling always restarts the countdown from this moment; the first
    /// automatic refresh fires one full period later.
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.core.set_auto_refresh(enabled);
    }

    /// Whether a fetch is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.core.fetching.load(Ordering::SeqCst)
    }

    /// Whether the auto-refresh timer is armed.
    pub fn auto_refresh_enabled(&self) -> bool {
        self.core.auto_enabled.load(Ordering::SeqCst)
    }

    /// When the result set was last published.
    pub async fn last_updated(&self) -> Option<OffsetDateTime> {
        *self.core.last_updated.read().await
    }

    /// Message of the most recent fetch failure, cleared on success.
    pub async fn last_error(&self) -> Option<String> {
        self.core.last_error.read().await.clone()
    }

    /// Stop the auto-refresh timer.
    pub fn shutdown(&self) {
        self.set_auto_refresh(false);
    }
}

impl SchedulerCore {
    /// Claim the fetch slot and spawn a refresh, or drop the request.
    fn try_trigger(self: &Arc<Self>) -> bool {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Refresh already in flight; trigger dropped");
            metrics::inc_triggers_dropped();
            return false;
        }

        let core = Arc::clone(self);
        tokio::spawn(async move {
            let _ = core.run_cycle().await;
            core.fetching.store(false, Ordering::SeqCst);
        });
        true
    }

    /// Fetch, scan, publish. The caller owns the fetching flag.
    #[instrument(skip(self))]
    async fn run_cycle(&self) -> Result<RefreshReport, QuoteError> {
        let _timer = metrics::timer_refresh();

        let fetch_start = std::time::Instant::now();
        let snapshot = match timeout(self.fetch_timeout, self.source.fetch_snapshot()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                self.record_failure(&err).await;
                return Err(err);
            }
            Err(_) => {
                let err = QuoteError::Timeout {
                    timeout_ms: self.fetch_timeout.as_millis() as u64,
                };
                self.record_failure(&err).await;
                return Err(err);
            }
        };
        metrics::record_quote_fetch_latency(fetch_start);

        let report = scan_snapshot(&snapshot, self.threshold);
        let refresh = RefreshReport {
            rows: snapshot.len(),
            opportunities: report.opportunities.len(),
            degenerate_quotes: report.degenerate_quotes,
        };

        self.store.set_opportunities(report.opportunities).await;
        *self.last_updated.write().await = Some(OffsetDateTime::now_utc());
        *self.last_error.write().await = None;
        metrics::inc_refreshes();
        metrics::set_open_opportunities(refresh.opportunities);

        info!(
            rows = refresh.rows,
            opportunities = refresh.opportunities,
            degenerate = refresh.degenerate_quotes,
            "Result set published"
        );
        Ok(refresh)
    }

    async fn record_failure(&self, err: &QuoteError) {
        warn!(error = %err, "Quote fetch failed; keeping last published result set");
        *self.last_error.write().await = Some(err.to_string());
        metrics::inc_refresh_failures();
    }

    fn set_auto_refresh(self: &Arc<Self>, enabled: bool) {
        let was = self.auto_enabled.swap(enabled, Ordering::SeqCst);

        let mut slot = self.timer_task.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = slot.take() {
            task.abort();
        }
        if enabled {
            // Anchor the countdown to the toggle moment, not to the first
            // poll of the timer task.
            let first_tick = Instant::now() + self.refresh_interval;
            let core = Arc::downgrade(self);
            let period = self.refresh_interval;
            *slot = Some(tokio::spawn(timer_loop(core, first_tick, period)));
        }
        drop(slot);

        if was != enabled {
            info!(enabled, "Auto-refresh toggled");
        }
    }
}

impl Drop for SchedulerCore {
    fn drop(&mut self) {
        let slot = self.timer_task.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = slot.take() {
            task.abort();
        }
    }
}

/// Periodic trigger loop. Exits when the scheduler core is gone.
async fn timer_loop(core: Weak<SchedulerCore>, first_tick: Instant, period: Duration) {
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match core.upgrade() {
            Some(core) => {
                core.try_trigger();
            }
            None => break,
        }
    }
}
