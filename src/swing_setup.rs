// =============================================================================
// Swing Setup — mean-reversion qualification rule
// =============================================================================
//
// A symbol qualifies when it has pulled back below its 20-day average while
// still holding above its 50-day average, with RSI in the neutral band:
//
//   sma50 < price < sma20   AND   40 <= rsi14 <= 55
// =============================================================================

use crate::indicators::{relative_strength_index, simple_moving_average, RSI_PERIOD};
use crate::types::QualifiedCandidate;

pub const RSI_FLOOR: f64 = 40.0;
pub const RSI_CEILING: f64 = 55.0;

/// Indicator values for one symbol on one scan date.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    /// Last close.
    pub price: f64,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi14: Option<f64>,
}

impl IndicatorSnapshot {
    /// Compute every indicator the series has enough history for.
    ///
    /// Returns `None` only for an empty series.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let price = *closes.last()?;
        Some(Self {
            price,
            sma20: simple_moving_average(closes, 20),
            sma50: simple_moving_average(closes, 50),
            sma200: simple_moving_average(closes, 200),
            rsi14: relative_strength_index(closes, RSI_PERIOD),
        })
    }

    /// Apply [`qualifies`]. Missing indicators never qualify.
    pub fn qualifies(&self) -> bool {
        match (self.sma20, self.sma50, self.rsi14) {
            (Some(sma20), Some(sma50), Some(rsi)) => qualifies(self.price, sma20, sma50, rsi),
            _ => false,
        }
    }

    /// Build the persisted candidate record when the setup holds.
    pub fn into_candidate(self, ticker: impl Into<String>) -> Option<QualifiedCandidate> {
        if !self.qualifies() {
            return None;
        }
        Some(QualifiedCandidate {
            ticker: ticker.into(),
            price: self.price,
            rsi: self.rsi14?,
            dma_20: self.sma20?,
            dma_50: self.sma50?,
            dma_200: self.sma200?,
        })
    }
}

/// The swing threshold predicate. NaN in any input yields `false`.
pub fn qualifies(price: f64, sma20: f64, sma50: f64, rsi: f64) -> bool {
    sma50 < price && price < sma20 && (RSI_FLOOR..=RSI_CEILING).contains(&rsi)
}
