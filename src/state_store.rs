// =============================================================================
// State Store — the persisted JSON document behind /scan and /state
// =============================================================================
//
// One pretty-printed JSON file holds the portfolio, closed trades and the
// append-only scan history. Writes use an atomic tmp + rename so a crash
// mid-write never leaves a truncated document behind.
//
// Read-modify-write in `append_scan` runs under an in-process mutex: two
// scans served by the same process both land in the history. Separate
// processes sharing one file are still last-writer-wins.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::types::{PersistedState, ScanRecord};

pub struct StateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Load the document. A missing file is an empty state, not an error.
    pub fn load(&self) -> Result<PersistedState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "state file missing, starting empty");
            return Ok(PersistedState::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read state from {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse state from {}", self.path.display()))
    }

    /// Persist the full document using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let content =
            serde_json::to_string_pretty(state).context("failed to serialise state to JSON")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create state dir {}", parent.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp state to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to rename tmp state to {}", self.path.display()))?;

        debug!(path = %self.path.display(), bytes = content.len(), "state saved (atomic)");
        Ok(())
    }

    /// Append one scan record and write the document back.
    ///
    /// Returns the state as written.
    pub fn append_scan(&self, record: ScanRecord) -> Result<PersistedState> {
        let _guard = self.write_lock.lock();

        let mut state = self.load()?;
        let scan_date = record.scan_date;
        let qualified = record.qualified_candidates.len();
        state.scan_history.push(record);
        self.save(&state)?;

        info!(
            %scan_date,
            qualified,
            history_len = state.scan_history.len(),
            "scan record appended"
        );
        Ok(state)
    }
}
