//! Pull-based quote source contract.

use crate::error::QuoteError;
use crate::market::types::EventQuotes;
use async_trait::async_trait;

/// Snapshot provider for cross-venue quotes.
///
/// A source returns one complete snapshot per call. It owns no scheduling
/// and no caching; the refresh scheduler decides when to pull.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the current snapshot of all tracked events.
    ///
    /// Row order is meaningful: the scanner derives event ids from it.
    async fn fetch_snapshot(&self) -> Result<Vec<EventQuotes>, QuoteError>;
}
