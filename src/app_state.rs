// =============================================================================
// Central Application State — Swing Scanner
// =============================================================================
//
// Shared by every HTTP handler via `Arc<AppState<S>>`. The bar source is a
// type parameter so the router runs unchanged against Polygon in production
// and against canned series in tests.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use crate::market_data::BarSource;
use crate::runtime_config::ScannerConfig;
use crate::scanner::Scanner;
use crate::state_store::StateStore;

pub struct AppState<S> {
    pub config: ScannerConfig,
    pub store: StateStore,
    pub source: S,

    /// Number of scans that completed and were persisted since startup.
    pub scans_completed: AtomicU64,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl<S: BarSource> AppState<S> {
    pub fn new(config: ScannerConfig, source: S) -> Self {
        let store = StateStore::new(config.state_path.clone());
        Self {
            config,
            store,
            source,
            scans_completed: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        }
    }

    /// A scanner over the fixed universe, wired to this state's source and store.
    pub fn scanner(&self) -> Scanner<'_, S> {
        Scanner::new(&self.source, &self.store, self.config.history_start)
    }

    pub fn record_scan(&self) -> u64 {
        self.scans_completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn scans_completed(&self) -> u64 {
        self.scans_completed.load(Ordering::SeqCst)
    }
}
