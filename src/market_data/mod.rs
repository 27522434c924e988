// =============================================================================
// Market Data — the bar source capability the scanner depends on
// =============================================================================

use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;

use crate::types::PriceBar;

/// Anything that can deliver daily bars for a symbol over a date range.
///
/// The production implementation is [`crate::polygon::PolygonClient`]; tests
/// plug in canned series.
pub trait BarSource: Send + Sync {
    /// Daily bars for `symbol` from `from` through `to` (inclusive), in
    /// ascending date order.
    fn daily_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<PriceBar>>> + Send;
}

/// Closing prices of `bars`, order preserved.
pub fn closing_series(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
pub mod fake;
