// =============================================================================
// Scanner — runs the swing setup over the fixed universe
// =============================================================================
//
// Pipeline, per symbol, in universe order:
//   1. Fetch daily bars from `history_start` through the scan date
//   2. Extract the closing series
//   3. Skip when fewer than 200 closes (no 200-day average possible)
//   4. Build the indicator snapshot (SMA 20/50/200, RSI 14)
//   5. Keep the symbol if the swing setup qualifies
//
// A failing symbol is logged and skipped; it never fails the scan. Only a
// persistence error does.
// =============================================================================

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::market_data::{closing_series, BarSource};
use crate::state_store::StateStore;
use crate::swing_setup::IndicatorSnapshot;
use crate::types::{QualifiedCandidate, ScanRecord};

/// Symbols scanned on every run, regardless of the requested universe id.
pub const UNIVERSE: [&str; 8] = ["AAPL", "MSFT", "NVDA", "GOOGL", "META", "AMZN", "TSLA", "NFLX"];

/// Universe id assumed when the caller does not name one.
pub const DEFAULT_UNIVERSE_ID: &str = "SP500";

/// Minimum closes needed before a symbol is evaluated.
pub const MIN_HISTORY_BARS: usize = 200;

/// Result of one scan, as returned to the HTTP caller.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub scan_date: NaiveDate,
    pub qualified: Vec<QualifiedCandidate>,
}

pub struct Scanner<'a, S> {
    source: &'a S,
    store: &'a StateStore,
    history_start: NaiveDate,
    symbols: Vec<String>,
}

impl<'a, S: BarSource> Scanner<'a, S> {
    pub fn new(source: &'a S, store: &'a StateStore, history_start: NaiveDate) -> Self {
        Self {
            source,
            store,
            history_start,
            symbols: UNIVERSE.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[cfg(test)]
    pub fn with_symbols(mut self, symbols: &[&str]) -> Self {
        self.symbols = symbols.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Scan every symbol as of `date` and append the result to the store.
    pub async fn run_scan(&self, date: NaiveDate, universe_id: &str) -> Result<ScanOutcome> {
        if universe_id != DEFAULT_UNIVERSE_ID {
            debug!(universe = universe_id, "universe id ignored, scanning fixed symbol list");
        }
        info!(%date, universe = universe_id, symbols = self.symbols.len(), "scan starting");

        let mut qualified = Vec::new();
        for symbol in &self.symbols {
            match self.scan_symbol(symbol, date).await {
                Ok(Some(candidate)) => {
                    info!(
                        symbol = %symbol,
                        price = candidate.price,
                        rsi = candidate.rsi,
                        "symbol qualified"
                    );
                    qualified.push(candidate);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(symbol = %symbol, error = %format!("{e:#}"), "error scanning symbol, skipping");
                }
            }
        }

        self.store
            .append_scan(ScanRecord::new(date, universe_id, qualified.clone()))?;

        info!(%date, qualified = qualified.len(), "scan complete");
        Ok(ScanOutcome {
            scan_date: date,
            qualified,
        })
    }

    /// Evaluate a single symbol. `Ok(None)` means "not a candidate", including
    /// the insufficient-history case.
    pub async fn scan_symbol(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<QualifiedCandidate>> {
        let bars = self.source.daily_bars(symbol, self.history_start, date).await?;
        let closes = closing_series(&bars);

        if closes.len() < MIN_HISTORY_BARS {
            debug!(
                symbol,
                bars = closes.len(),
                required = MIN_HISTORY_BARS,
                "insufficient history, skipping"
            );
            return Ok(None);
        }

        let Some(snapshot) = IndicatorSnapshot::from_closes(&closes) else {
            return Ok(None);
        };

        debug!(
            symbol,
            price = snapshot.price,
            sma20 = ?snapshot.sma20,
            sma50 = ?snapshot.sma50,
            sma200 = ?snapshot.sma200,
            rsi14 = ?snapshot.rsi14,
            "indicators computed"
        );

        Ok(snapshot.into_candidate(symbol))
    }
}
