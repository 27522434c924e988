// =============================================================================
// Shared types used across the swing scanner
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current on-disk schema version of [`PersistedState`].
pub const STATE_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    STATE_SCHEMA_VERSION
}

/// A single daily bar as delivered by the market-data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

/// A symbol that matched the swing setup on a given scan date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedCandidate {
    pub ticker: String,
    pub price: f64,
    pub rsi: f64,
    pub dma_20: f64,
    pub dma_50: f64,
    pub dma_200: f64,
}

/// One entry of the append-only scan history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan (UUID v4).
    #[serde(default)]
    pub id: Option<String>,

    pub scan_date: NaiveDate,

    /// Universe id requested by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe: Option<String>,

    /// RFC 3339 timestamp of when the scan finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub qualified_candidates: Vec<QualifiedCandidate>,
}

impl ScanRecord {
    pub fn new(
        scan_date: NaiveDate,
        universe: impl Into<String>,
        qualified_candidates: Vec<QualifiedCandidate>,
    ) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            scan_date,
            universe: Some(universe.into()),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            qualified_candidates,
        }
    }
}

/// The whole JSON document kept on disk.
///
/// `portfolio` and `closed_trades` are carried through untouched; the scanner
/// only ever appends to `scan_history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default = "default_schema_version")]
    pub version: u32,

    #[serde(default)]
    pub portfolio: Vec<serde_json::Value>,

    #[serde(default)]
    pub closed_trades: Vec<serde_json::Value>,

    #[serde(default)]
    pub scan_history: Vec<ScanRecord>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_SCHEMA_VERSION,
            portfolio: Vec::new(),
            closed_trades: Vec::new(),
            scan_history: Vec::new(),
        }
    }
}
