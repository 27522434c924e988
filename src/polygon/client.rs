// =============================================================================
// Polygon.io REST Client — daily aggregate bars
// =============================================================================
//
// SECURITY: The API key travels as the `apiKey` query parameter required by
// Polygon. It is never logged; the `Debug` impl redacts it and request URLs
// are not included in log lines or error contexts.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::BarSource;
use crate::types::PriceBar;

/// Upper bound on bars returned by one aggregates request.
const AGGS_LIMIT: u32 = 50_000;

/// Per-request timeout. A slow symbol becomes a skipped symbol.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Raw aggregates payload from `/v2/aggs/ticker/...`.
#[derive(Debug, Deserialize)]
pub struct AggsResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<AggBar>>,
}

/// One aggregate bar. Only the fields the scanner needs are decoded.
#[derive(Debug, Deserialize)]
pub struct AggBar {
    /// Bar start, Unix epoch milliseconds.
    pub t: i64,
    /// Close price.
    #[serde(default)]
    pub c: Option<f64>,
}

/// Polygon.io market data client.
#[derive(Clone)]
pub struct PolygonClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl PolygonClient {
    /// Create a new `PolygonClient` against `base_url`
    /// (normally `https://api.polygon.io`).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "PolygonClient initialised");

        Ok(Self {
            api_key: api_key.into(),
            base_url,
            client,
        })
    }

    /// GET /v2/aggs/ticker/{symbol}/range/1/day/{from}/{to}
    #[instrument(skip(self), name = "polygon::get_daily_aggs")]
    pub async fn get_daily_aggs(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, symbol, from, to
        );
        let limit = AGGS_LIMIT.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!("GET aggs request failed for {symbol}: {}", e.without_url())
            })?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| {
                anyhow::anyhow!("failed to parse aggs response for {symbol}: {}", e.without_url())
            })?;

        if !status.is_success() {
            anyhow::bail!("Polygon aggs for {symbol} returned {status}: {body}");
        }

        let parsed: AggsResponse = serde_json::from_value(body)
            .with_context(|| format!("unexpected aggs payload for {symbol}"))?;

        let bars = bars_from_response(parsed)
            .with_context(|| format!("Polygon rejected aggs request for {symbol}"))?;

        debug!(symbol, count = bars.len(), "daily aggs fetched");
        Ok(bars)
    }
}

impl BarSource for PolygonClient {
    async fn daily_bars(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        self.get_daily_aggs(symbol, from, to).await
    }
}

/// Convert a decoded aggregates payload into date-ordered price bars.
pub fn bars_from_response(resp: AggsResponse) -> Result<Vec<PriceBar>> {
    if resp.status.as_deref() == Some("ERROR") {
        anyhow::bail!(
            "{}",
            resp.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    let raw = resp.results.unwrap_or_default();
    let mut bars = Vec::with_capacity(raw.len());

    for agg in raw {
        let Some(close) = agg.c else {
            warn!(t = agg.t, "skipping aggregate bar without close");
            continue;
        };
        let date = DateTime::from_timestamp_millis(agg.t)
            .with_context(|| format!("bar timestamp {} out of range", agg.t))?
            .date_naive();
        bars.push(PriceBar { date, close });
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

impl std::fmt::Debug for PolygonClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
