//! Simulated cross-venue quote feed.
//!
//! Serves a fixed catalog of 24 crypto events and generates fresh prices on
//! every pull. Polymarket YES is drawn from [0.30, 0.70), NO hovers around
//! the $1.00 complement, and Opinion Labs quotes drift off the Polymarket
//! ones. All generated prices land in (0.20, 0.80), so every row satisfies
//! the quote contract.

use crate::error::QuoteError;
use crate::market::source::QuoteSource;
use crate::market::types::{Category, EventDescriptor, EventQuotes, Quote};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::time::Duration;

static CATALOG: Lazy<Vec<EventDescriptor>> = Lazy::new(|| {
    let names: [(&str, Category); 24] = [
        ("Bitcoin reaches $100k", Category::Bitcoin),
        ("Bitcoin dominance > 50%", Category::Bitcoin),
        ("Bitcoin halving date", Category::Bitcoin),
        ("BTC price above $80k", Category::Bitcoin),
        ("Ethereum hits $5k", Category::Ethereum),
        ("ETH merge approved", Category::Ethereum),
        ("Ethereum staking hits 25M ETH", Category::Ethereum),
        ("ETH gas fees below 20 Gwei", Category::Ethereum),
        ("Solana hits $200", Category::Altcoins),
        ("XRP reaches $3", Category::Altcoins),
        ("Cardano hits $2", Category::Altcoins),
        ("Polkadot breaks $50", Category::Altcoins),
        ("Total TVL hits $100B", Category::Defi),
        ("Aave governance vote passes", Category::Defi),
        ("Uniswap V4 launch", Category::Defi),
        ("DeFi yield above 10%", Category::Defi),
        ("NFT trading volume $10B", Category::Nft),
        ("Blue-chip NFT floor up 50%", Category::Nft),
        ("Ordinals inscription 1M", Category::Nft),
        ("NFT market recovery", Category::Nft),
        ("Arbitrum hits 1M daily users", Category::Layer2),
        ("Optimism transaction volume up", Category::Layer2),
        ("zkSync TVL grows", Category::Layer2),
        ("Polygon fee optimization", Category::Layer2),
    ];
    names
        .into_iter()
        .map(|(name, category)| EventDescriptor::new(name, category))
        .collect()
});

/// The fixed event catalog, in snapshot row order.
pub fn catalog() -> &'static [EventDescriptor] {
    &CATALOG
}

/// Configuration for the simulated feed.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Artificial fetch latency in milliseconds.
    pub latency_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { latency_ms: 500 }
    }
}

/// Quote source backed by the random generator above.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSource {
    config: SimConfig,
}

impl SimulatedSource {
    /// Create a source with default latency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source with custom configuration.
    pub fn with_config(config: SimConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    async fn fetch_snapshot(&self) -> Result<Vec<EventQuotes>, QuoteError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
        Ok(CATALOG.iter().map(quote_event).collect())
    }
}

fn quote_event(event: &EventDescriptor) -> EventQuotes {
    let poly_yes = rand::random::<f64>() * 0.4 + 0.3;
    let poly_no = 1.0 - poly_yes + (rand::random::<f64>() - 0.5) * 0.12;
    let opinion_yes = poly_yes + (rand::random::<f64>() - 0.5) * 0.08;
    let opinion_no = poly_no + (rand::random::<f64>() - 0.5) * 0.08;
    EventQuotes {
        event: event.clone(),
        polymarket: Quote::new(price(poly_yes), price(poly_no)),
        opinion: Quote::new(price(opinion_yes), price(opinion_no)),
    }
}

/// Quantize a generated price to 4 decimal places.
fn price(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_four_events_per_category() {
        assert_eq!(catalog().len(), 24);
        for category in Category::ALL {
            let count = catalog().iter().filter(|e| e.category == category).count();
            assert_eq!(count, 4, "category {category} should have 4 events");
        }
    }

    #[test]
    fn catalog_starts_with_bitcoin_events() {
        assert_eq!(catalog()[0].name, "Bitcoin reaches $100k");
        assert_eq!(catalog()[0].category, Category::Bitcoin);
        assert_eq!(catalog()[23].name, "Polygon fee optimization");
        assert_eq!(catalog()[23].category, Category::Layer2);
    }

    #[tokio::test]
    async fn snapshot_follows_catalog_order() {
        let source = SimulatedSource::with_config(SimConfig { latency_ms: 0 });
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 24);
        for (row, event) in snapshot.iter().zip(catalog()) {
            assert_eq!(&row.event, event);
        }
    }

    #[tokio::test]
    async fn generated_quotes_are_valid_and_quantized() {
        let source = SimulatedSource::with_config(SimConfig { latency_ms: 0 });
        let snapshot = source.fetch_snapshot().await.unwrap();
        for row in &snapshot {
            assert!(row.is_valid(), "row {} should be valid", row.event.name);
            for quote in [row.polymarket, row.opinion] {
                assert!(quote.yes < Decimal::ONE);
                assert!(quote.no < Decimal::ONE);
                assert!(quote.yes.scale() <= 4);
                assert!(quote.no.scale() <= 4);
            }
        }
    }
}
