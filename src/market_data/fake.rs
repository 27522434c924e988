// In-memory bar source for tests.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use parking_lot::Mutex;

use super::BarSource;
use crate::types::PriceBar;

/// Serves canned closing series per symbol and records every request.
#[derive(Default)]
pub struct FakeBarSource {
    series: HashMap<String, Result<Vec<f64>, String>>,
    pub requests: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
}

impl FakeBarSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.series.insert(symbol.to_string(), Ok(closes));
        self
    }

    pub fn with_error(mut self, symbol: &str, message: &str) -> Self {
        self.series.insert(symbol.to_string(), Err(message.to_string()));
        self
    }

    pub fn requested_symbols(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(s, _, _)| s.clone()).collect()
    }
}

impl BarSource for FakeBarSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        self.requests.lock().push((symbol.to_string(), from, to));

        match self.series.get(symbol) {
            Some(Ok(closes)) => Ok(closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceBar {
                    date: from + Days::new(i as u64),
                    close,
                })
                .collect()),
            Some(Err(message)) => anyhow::bail!("{message}"),
            None => Ok(Vec::new()),
        }
    }
}

/// 200 closes whose indicators land exactly on
/// price = 19, sma20 = 20, sma50 = 18, sma200 = 18, rsi14 = 45.
pub fn qualifying_series() -> Vec<f64> {
    let mut closes = vec![18.0; 150];
    closes.extend([16.0; 5]);
    closes.extend([15.0; 16]);
    closes.extend([25.0, 21.0, 22.0, 18.0, 19.0, 20.0, 16.0, 17.0, 22.0]);
    for _ in 0..10 {
        closes.extend([21.0, 19.0]);
    }
    closes
}
