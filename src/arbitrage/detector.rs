//! Arbitrage opportunity detection over quote snapshots.

use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::calculator::{calculate_opportunity, Opportunity};
use crate::market::types::EventQuotes;
use crate::metrics;

/// Outcome of scanning one snapshot.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Opportunities that strictly cleared the threshold, in snapshot order.
    pub opportunities: Vec<Opportunity>,
    /// Rows that satisfied the quote contract and were evaluated.
    pub evaluated: usize,
    /// Rows rejected for violating the quote contract.
    pub degenerate_quotes: usize,
}

/// Scan a snapshot for arbitrage opportunities.
///
/// Event ids are snapshot row indices, so a rejected row does not shift the
/// ids of the rows after it. Degenerate quotes are reported and skipped; they
/// never fail the whole scan.
#[instrument(skip(snapshot), fields(rows = snapshot.len()))]
pub fn scan_snapshot(snapshot: &[EventQuotes], threshold: Decimal) -> ScanReport {
    let mut report = ScanReport::default();

    for (event_id, row) in snapshot.iter().enumerate() {
        if !row.is_valid() {
            warn!(
                event = %row.event.name,
                polymarket_yes = %row.polymarket.yes,
                polymarket_no = %row.polymarket.no,
                opinion_yes = %row.opinion.yes,
                opinion_no = %row.opinion.no,
                "Degenerate quote rejected"
            );
            metrics::inc_degenerate_quotes();
            report.degenerate_quotes += 1;
            continue;
        }

        report.evaluated += 1;
        if let Some(opp) =
            calculate_opportunity(event_id, &row.event, row.polymarket, row.opinion, threshold)
        {
            debug!(
                event = %opp.event_name,
                max_profit = %opp.max_profit.round_dp(2),
                direction = %opp.direction,
                "Opportunity detected"
            );
            metrics::inc_opportunities_detected();
            report.opportunities.push(opp);
        }
    }

    info!(
        evaluated = report.evaluated,
        opportunities = report.opportunities.len(),
        degenerate = report.degenerate_quotes,
        "Snapshot scan complete"
    );
    report
}
