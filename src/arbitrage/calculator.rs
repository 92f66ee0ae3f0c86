//! Pure arbitrage math for two-venue complete sets.
//!
//! Buying YES + NO at one venue for less than $1.00 locks in a profit,
//! because the complete set always settles at exactly $1.00. All math uses
//! Decimal. NEVER use f64 for money.

use crate::market::types::{Category, EventDescriptor, Quote, Venue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Which venue to buy the complete set on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// Buy YES + NO on Polymarket, settle against Opinion Labs.
    BuyPolymarket,
    /// Buy YES + NO on Opinion Labs, settle against Polymarket.
    BuyOpinion,
}

impl Direction {
    /// Venue to buy the complete set on.
    pub fn buy_venue(&self) -> Venue {
        match self {
            Direction::BuyPolymarket => Venue::Polymarket,
            Direction::BuyOpinion => Venue::Opinion,
        }
    }

    /// Venue on the other side of the trade.
    pub fn sell_venue(&self) -> Venue {
        self.buy_venue().other()
    }

    /// Display string for the trade plan.
    pub fn strategy(&self) -> String {
        format!(
            "BUY BOTH ON {} → SELL ON {}",
            self.buy_venue().label().to_uppercase(),
            self.sell_venue().label().to_uppercase()
        )
    }
}

/// A detected arbitrage opportunity on one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    /// Snapshot row index; stable while the event list is stable.
    pub event_id: usize,
    /// Event name.
    pub event_name: String,
    /// Event category.
    pub category: Category,
    /// Polymarket YES/NO quote.
    pub polymarket: Quote,
    /// Opinion Labs YES/NO quote.
    pub opinion: Quote,
    /// Complete set cost on Polymarket.
    pub polymarket_total: Decimal,
    /// Complete set cost on Opinion Labs.
    pub opinion_total: Decimal,
    /// Profit percentage buying the set on Polymarket.
    pub profit_buy_polymarket: Decimal,
    /// Profit percentage buying the set on Opinion Labs.
    pub profit_buy_opinion: Decimal,
    /// The better of the two profit percentages.
    pub max_profit: Decimal,
    /// Side the max profit comes from. Ties go to Polymarket.
    pub direction: Direction,
    /// When this opportunity was computed.
    pub computed_at: OffsetDateTime,
}

impl Opportunity {
    /// Complete set cost at the buy venue.
    pub fn buy_total(&self) -> Decimal {
        match self.direction {
            Direction::BuyPolymarket => self.polymarket_total,
            Direction::BuyOpinion => self.opinion_total,
        }
    }
}

/// Profit percentage of buying a complete set at `total` and settling at $1.00.
///
/// `(1 / total - 1) * 100`. Returns zero for a non-positive total so callers
/// never divide by zero.
pub fn profit_pct(total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (Decimal::ONE / total - Decimal::ONE) * Decimal::ONE_HUNDRED
}

/// Evaluate one event for arbitrage.
///
/// Pure function of its inputs apart from the timestamp. Returns None when
/// neither side strictly clears `threshold`, or when a quote total is not
/// positive. Profits are kept at full precision; rounding is display-only.
pub fn calculate_opportunity(
    event_id: usize,
    event: &EventDescriptor,
    polymarket: Quote,
    opinion: Quote,
    threshold: Decimal,
) -> Option<Opportunity> {
    let polymarket_total = polymarket.total();
    let opinion_total = opinion.total();
    if polymarket_total <= Decimal::ZERO || opinion_total <= Decimal::ZERO {
        return None;
    }

    let profit_buy_polymarket = profit_pct(polymarket_total);
    let profit_buy_opinion = profit_pct(opinion_total);

    let (max_profit, direction) = if profit_buy_polymarket >= profit_buy_opinion {
        (profit_buy_polymarket, Direction::BuyPolymarket)
    } else {
        (profit_buy_opinion, Direction::BuyOpinion)
    };

    if max_profit <= threshold {
        return None;
    }

    Some(Opportunity {
        event_id,
        event_name: event.name.clone(),
        category: event.category,
        polymarket,
        opinion,
        polymarket_total,
        opinion_total,
        profit_buy_polymarket,
        profit_buy_opinion,
        max_profit,
        direction,
        computed_at: OffsetDateTime::now_utc(),
    })
}
