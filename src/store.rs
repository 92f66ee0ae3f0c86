//! Shared store for the last published scan results.
//!
//! The refresh scheduler replaces the result set wholesale after each
//! successful scan; readers pull filtered, sorted views on demand. Fetch
//! failures never touch the store, so the last good result set stays
//! visible.

use crate::arbitrage::calculator::Opportunity;
use crate::market::types::CategoryFilter;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreInner {
    opportunities: Vec<Opportunity>,
    filter: CategoryFilter,
}

/// Published opportunities plus the active category filter.
#[derive(Debug, Default)]
pub struct OpportunityStore {
    inner: RwLock<StoreInner>,
}

/// Filtered, sorted projection of the result set with aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// Opportunities passing the filter, best profit first.
    pub items: Vec<Opportunity>,
    /// Number of items in the view.
    pub count: usize,
    /// Mean max profit over the view; zero when empty.
    pub average_profit: Decimal,
    /// Sum of max profits over the view.
    pub total_profit: Decimal,
}

impl OpportunityStore {
    /// Create an empty store with no filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published result set wholesale.
    pub async fn set_opportunities(&self, opportunities: Vec<Opportunity>) {
        self.inner.write().await.opportunities = opportunities;
    }

    /// Change the category filter applied to views.
    pub async fn set_filter(&self, filter: CategoryFilter) {
        self.inner.write().await.filter = filter;
    }

    /// Currently active category filter.
    pub async fn filter(&self) -> CategoryFilter {
        self.inner.read().await.filter
    }

    /// Number of published opportunities before filtering.
    pub async fn len_unfiltered(&self) -> usize {
        self.inner.read().await.opportunities.len()
    }

    /// Project the result set through the filter.
    ///
    /// Items are sorted by descending max profit; the sort is stable, so
    /// equal profits keep their snapshot order. Aggregates cover only the
    /// items in the view.
    pub async fn view(&self) -> ResultView {
        let inner = self.inner.read().await;
        let mut items: Vec<Opportunity> = inner
            .opportunities
            .iter()
            .filter(|o| inner.filter.matches(o.category))
            .cloned()
            .collect();
        drop(inner);

        items.sort_by(|a, b| b.max_profit.cmp(&a.max_profit));

        let count = items.len();
        let total_profit: Decimal = items.iter().map(|o| o.max_profit).sum();
        let average_profit = if count == 0 {
            Decimal::ZERO
        } else {
            total_profit / Decimal::from(count as u64)
        };

        ResultView {
            items,
            count,
            average_profit,
            total_profit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::calculator::Direction;
    use crate::market::types::{Category, Quote};
    use rust_decimal_macros::dec;
    use time::OffsetDateTime;

    fn opp(event_id: usize, category: Category, max_profit: Decimal) -> Opportunity {
        Opportunity {
            event_id,
            event_name: format!("event-{event_id}"),
            category,
            polymarket: Quote::new(dec!(0.45), dec!(0.50)),
            opinion: Quote::new(dec!(0.50), dec!(0.52)),
            polymarket_total: dec!(0.95),
            opinion_total: dec!(1.02),
            profit_buy_polymarket: max_profit,
            profit_buy_opinion: dec!(-1.96),
            max_profit,
            direction: Direction::BuyPolymarket,
            computed_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn empty_store_views_zero_aggregates() {
        let store = OpportunityStore::new();
        let view = store.view().await;
        assert!(view.items.is_empty());
        assert_eq!(view.count, 0);
        assert_eq!(view.average_profit, Decimal::ZERO);
        assert_eq!(view.total_profit, Decimal::ZERO);
    }

    #[tokio::test]
    async fn view_sorts_descending_by_profit() {
        let store = OpportunityStore::new();
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(1.0)),
                opp(1, Category::Bitcoin, dec!(5.0)),
                opp(2, Category::Bitcoin, dec!(3.0)),
            ])
            .await;

        let view = store.view().await;
        let ids: Vec<usize> = view.items.iter().map(|o| o.event_id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn equal_profits_keep_snapshot_order() {
        let store = OpportunityStore::new();
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(2.0)),
                opp(1, Category::Nft, dec!(2.0)),
                opp(2, Category::Defi, dec!(4.0)),
            ])
            .await;

        let view = store.view().await;
        let ids: Vec<usize> = view.items.iter().map(|o| o.event_id).collect();
        assert_eq!(ids, vec![2, 0, 1]);
    }

    #[tokio::test]
    async fn filter_projects_matching_category() {
        let store = OpportunityStore::new();
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(1.0)),
                opp(1, Category::Ethereum, dec!(2.0)),
                opp(2, Category::Ethereum, dec!(3.0)),
            ])
            .await;
        store
            .set_filter(CategoryFilter::Only(Category::Ethereum))
            .await;

        let view = store.view().await;
        assert_eq!(view.count, 2);
        assert!(view.items.iter().all(|o| o.category == Category::Ethereum));
        // Filtering is a projection; the stored set is untouched.
        assert_eq!(store.len_unfiltered().await, 3);

        store.set_filter(CategoryFilter::All).await;
        assert_eq!(store.view().await.count, 3);
    }

    #[tokio::test]
    async fn aggregates_cover_only_the_view() {
        let store = OpportunityStore::new();
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(2.0)),
                opp(1, Category::Ethereum, dec!(4.0)),
                opp(2, Category::Ethereum, dec!(6.0)),
            ])
            .await;
        store
            .set_filter(CategoryFilter::Only(Category::Ethereum))
            .await;

        let view = store.view().await;
        assert_eq!(view.total_profit, dec!(10.0));
        assert_eq!(view.average_profit, dec!(5.0));
    }

    #[tokio::test]
    async fn set_opportunities_replaces_wholesale() {
        let store = OpportunityStore::new();
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(1.0)),
                opp(1, Category::Nft, dec!(2.0)),
            ])
            .await;
        store
            .set_opportunities(vec![opp(7, Category::Defi, dec!(9.0))])
            .await;

        let view = store.view().await;
        assert_eq!(view.count, 1);
        assert_eq!(view.items[0].event_id, 7);
    }

    #[tokio::test]
    async fn filter_survives_replacement() {
        let store = OpportunityStore::new();
        store
            .set_filter(CategoryFilter::Only(Category::Defi))
            .await;
        store
            .set_opportunities(vec![
                opp(0, Category::Bitcoin, dec!(1.0)),
                opp(1, Category::Defi, dec!(2.0)),
            ])
            .await;

        assert_eq!(store.filter().await, CategoryFilter::Only(Category::Defi));
        let view = store.view().await;
        assert_eq!(view.count, 1);
        assert_eq!(view.items[0].event_id, 1);
    }
}
