//! Cross-venue crypto prediction market arbitrage scanner.
//!
//! This library scans paired quotes for the same binary event on Polymarket
//! and Opinion Labs, looking for complete-set arbitrage: buying both YES and
//! NO at one venue for a combined cost < $1.00 guarantees profit regardless
//! of how the event resolves.
//!
//! # Strategy
//!
//! A complete YES + NO set always settles at exactly $1.00:
//!
//! ```text
//! Polymarket YES:   $0.45
//! Polymarket NO:    $0.50
//! ─────────────────────────
//! Total:            $0.95 < $1.00 ✅
//! Profit:           (1 / 0.95 - 1) × 100 ≈ 5.26% guaranteed
//! ```
//!
//! The scanner prices both directions per event, keeps the better side when
//! it strictly clears the profit threshold, and republishes the result set on
//! every refresh.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Quote types, source contract, simulated feed
//! - [`arbitrage`]: Profit math and snapshot scanning
//! - [`store`]: Published result sets and filtered views
//! - [`scheduler`]: Manual and periodic refresh orchestration
//! - [`metrics`]: Prometheus metrics for the refresh pipeline
//! - [`api`]: HTTP API for views, controls, and health/metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod market;
pub mod metrics;
pub mod scheduler;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{QuoteError, Result, ScannerError};
pub use scheduler::{RefreshReport, RefreshScheduler};
pub use store::{OpportunityStore, ResultView};
