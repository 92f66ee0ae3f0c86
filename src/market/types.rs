//! Core types for cross-venue prediction market quotes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Category a tracked event belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Bitcoin price and network events.
    Bitcoin,
    /// Ethereum price and protocol events.
    Ethereum,
    /// Other layer-1 coins.
    Altcoins,
    /// DeFi protocol events.
    Defi,
    /// NFT market events.
    Nft,
    /// Layer-2 scaling events.
    Layer2,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 6] = [
        Category::Bitcoin,
        Category::Ethereum,
        Category::Altcoins,
        Category::Defi,
        Category::Nft,
        Category::Layer2,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bitcoin => "Bitcoin",
            Category::Ethereum => "Ethereum",
            Category::Altcoins => "Altcoins",
            Category::Defi => "DeFi",
            Category::Nft => "NFT",
            Category::Layer2 => "Layer 2",
        }
    }
}

/// Category scope applied to the published view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Pass every opportunity through.
    #[default]
    All,
    /// Keep only opportunities in one category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether an opportunity in `category` passes this filter.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Markets",
            CategoryFilter::Only(c) => c.label(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Category::from_str(s).map(CategoryFilter::Only)
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => write!(f, "{}", c),
        }
    }
}

/// Trading venue an event is quoted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Venue {
    /// Polymarket quotes.
    Polymarket,
    /// Opinion Labs quotes.
    Opinion,
}

impl Venue {
    /// The other venue of the pair.
    pub fn other(&self) -> Self {
        match self {
            Venue::Polymarket => Venue::Opinion,
            Venue::Opinion => Venue::Polymarket,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Venue::Polymarket => "Polymarket",
            Venue::Opinion => "Opinion Labs",
        }
    }
}

/// Identifies one tracked market event; stable across refreshes in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Event name (e.g., "Bitcoin reaches $100k").
    pub name: String,
    /// Category the event belongs to.
    pub category: Category,
}

impl EventDescriptor {
    /// Create a descriptor.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
        }
    }
}

/// Per-venue YES/NO price pair for one event.
///
/// Venues price independently, so YES + NO is not required to sum to $1.00;
/// the gap is exactly the arbitrage source. A complete set settles at $1.00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// YES share price in dollars.
    pub yes: Decimal,
    /// NO share price in dollars.
    pub no: Decimal,
}

impl Quote {
    /// Create a quote from YES and NO prices.
    pub fn new(yes: Decimal, no: Decimal) -> Self {
        Self { yes, no }
    }

    /// Cost of the complete YES + NO set at this venue.
    pub fn total(&self) -> Decimal {
        self.yes + self.no
    }

    /// Contract check: both prices strictly positive.
    pub fn is_valid(&self) -> bool {
        self.yes > Decimal::ZERO && self.no > Decimal::ZERO
    }
}

/// One snapshot row: an event quoted on both venues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuotes {
    /// The quoted event.
    pub event: EventDescriptor,
    /// Polymarket YES/NO quote.
    pub polymarket: Quote,
    /// Opinion Labs YES/NO quote.
    pub opinion: Quote,
}

impl EventQuotes {
    /// Quote for a given venue.
    pub fn quote(&self, venue: Venue) -> Quote {
        match venue {
            Venue::Polymarket => self.polymarket,
            Venue::Opinion => self.opinion,
        }
    }

    /// Whether both venues satisfy the quote contract.
    pub fn is_valid(&self) -> bool {
        self.polymarket.is_valid() && self.opinion.is_valid()
    }
}
