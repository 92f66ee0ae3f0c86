//! Arbitrage module for detecting cross-venue opportunities.
//!
//! This module handles:
//! - Profit math on two-venue complete sets
//! - Snapshot scanning with degenerate-quote reporting

pub mod calculator;
pub mod detector;

pub use calculator::{calculate_opportunity, profit_pct, Direction, Opportunity};
pub use detector::{scan_snapshot, ScanReport};
