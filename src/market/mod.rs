//! Market module for cross-venue prediction market quotes.
//!
//! This module handles:
//! - Quote and event types
//! - The pull-based quote source contract
//! - Simulated two-venue feed
//! - Mock source for testing

pub mod mock;
pub mod sim;
pub mod source;
pub mod types;

pub use mock::MockSource;
pub use sim::{SimConfig, SimulatedSource};
pub use source::QuoteSource;
pub use types::{Category, CategoryFilter, EventDescriptor, EventQuotes, Quote, Venue};
