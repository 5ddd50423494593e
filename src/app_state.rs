// =============================================================================
// Central Application State
// =============================================================================
//
// The compute pipeline is stateless; what the service keeps between requests
// is only the store of already-computed sheets, held under explicit UUID
// handles so a later download request can fetch the exact bytes the upload
// produced. The store is capped: beyond `max_stored_sheets` the oldest
// result is evicted.
//
// Thread safety:
//   - parking_lot::RwLock around the sheet map and eviction queue.
//   - An atomic version counter for lock-free change tracking, surfaced via
//     the health endpoint.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::runtime_config::RuntimeConfig;

/// A computed sheet retained for preview and download.
#[derive(Debug, Clone)]
pub struct StoredSheet {
    pub id: Uuid,
    /// Original upload filename, when the client sent one.
    pub filename: Option<String>,
    /// ISO 8601 timestamp of the computation.
    pub created_at: String,
    pub row_count: usize,
    /// Output header row, label column first when present.
    pub columns: Vec<String>,
    /// The full rendered CSV, exactly what download returns.
    pub csv: String,
    /// Leading rows rendered the same way as the CSV cells.
    pub preview: Vec<Vec<String>>,
}

/// Shared service state, held behind `Arc` by every request handler.
pub struct AppState {
    pub runtime_config: RuntimeConfig,

    /// Monotonically increasing counter, bumped whenever a sheet is stored
    /// or evicted.
    state_version: AtomicU64,

    sheets: RwLock<HashMap<Uuid, StoredSheet>>,
    /// Insertion order for eviction, oldest at the front.
    order: RwLock<VecDeque<Uuid>>,
}

impl AppState {
    pub fn new(runtime_config: RuntimeConfig) -> Self {
        Self {
            runtime_config,
            state_version: AtomicU64::new(0),
            sheets: RwLock::new(HashMap::new()),
            order: RwLock::new(VecDeque::new()),
        }
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::Relaxed)
    }

    fn increment_version(&self) {
        self.state_version.fetch_add(1, Ordering::Relaxed);
    }

    /// Store a computed sheet, evicting the oldest entries beyond the
    /// configured retention cap.
    pub fn insert_sheet(&self, sheet: StoredSheet) {
        let cap = self.runtime_config.max_stored_sheets.max(1);
        {
            let mut sheets = self.sheets.write();
            let mut order = self.order.write();
            order.push_back(sheet.id);
            sheets.insert(sheet.id, sheet);
            while order.len() > cap {
                if let Some(oldest) = order.pop_front() {
                    sheets.remove(&oldest);
                }
            }
        }
        self.increment_version();
    }

    pub fn get_sheet(&self, id: &Uuid) -> Option<StoredSheet> {
        self.sheets.read().get(id).cloned()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.read().len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(id: Uuid) -> StoredSheet {
        StoredSheet {
            id,
            filename: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            row_count: 0,
            columns: Vec::new(),
            csv: String::new(),
            preview: Vec::new(),
        }
    }

    fn state_with_cap(cap: usize) -> AppState {
        AppState::new(RuntimeConfig {
            max_stored_sheets: cap,
            ..RuntimeConfig::default()
        })
    }

    #[test]
    fn insert_and_fetch() {
        let state = state_with_cap(5);
        let id = Uuid::new_v4();
        state.insert_sheet(sheet(id));
        assert!(state.get_sheet(&id).is_some());
        assert!(state.get_sheet(&Uuid::new_v4()).is_none());
        assert_eq!(state.sheet_count(), 1);
    }

    #[test]
    fn eviction_drops_oldest_first() {
        let state = state_with_cap(2);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let third = Uuid::new_v4();
        state.insert_sheet(sheet(first));
        state.insert_sheet(sheet(second));
        state.insert_sheet(sheet(third));

        assert_eq!(state.sheet_count(), 2);
        assert!(state.get_sheet(&first).is_none());
        assert!(state.get_sheet(&second).is_some());
        assert!(state.get_sheet(&third).is_some());
    }

    #[test]
    fn version_advances_on_insert() {
        let state = state_with_cap(5);
        let before = state.current_state_version();
        state.insert_sheet(sheet(Uuid::new_v4()));
        assert!(state.current_state_version() > before);
    }
}
