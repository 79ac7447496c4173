use crate::domain::entities::ConflictRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    #[default]
    Idle,
    Syncing,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
    Fetch,
}

/// Session-wide sync bookkeeping. Mutated exclusively by the orchestrator,
/// published to subscribers as part of the view snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub status: SyncPhase,
    pub current_operation: Option<SyncOperation>,
    pub current_item_id: Option<String>,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub pending_count: u32,
    /// At most one entry per item id.
    pub conflicts: Vec<ConflictRecord>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn begin(&mut self, operation: SyncOperation, item_id: Option<String>) {
        self.status = SyncPhase::Syncing;
        self.current_operation = Some(operation);
        self.current_item_id = item_id;
    }

    pub fn finish_success(&mut self) {
        self.status = SyncPhase::Success;
        self.current_operation = None;
        self.current_item_id = None;
        self.last_sync_time = Some(Utc::now());
        self.error = None;
    }

    pub fn finish_error(&mut self, message: String) {
        self.status = SyncPhase::Error;
        self.current_operation = None;
        self.current_item_id = None;
        self.error = Some(message);
    }

    /// Records a conflict, replacing any earlier entry for the same item.
    pub fn record_conflict(&mut self, conflict: ConflictRecord) {
        self.conflicts.retain(|c| c.item_id != conflict.item_id);
        self.conflicts.push(conflict);
    }

    pub fn resolve_conflict(&mut self, item_id: &str) {
        for conflict in &mut self.conflicts {
            if conflict.item_id == item_id {
                conflict.resolved = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict(item_id: &str) -> ConflictRecord {
        ConflictRecord::new(item_id.to_string(), Utc::now(), Utc::now())
    }

    #[test]
    fn test_record_conflict_keeps_one_entry_per_item() {
        let mut state = SyncState::new();
        state.record_conflict(conflict("8841"));
        state.record_conflict(conflict("8841"));
        state.record_conflict(conflict("8842"));
        assert_eq!(state.conflicts.len(), 2);
    }

    #[test]
    fn test_resolve_conflict_marks_matching_entry() {
        let mut state = SyncState::new();
        state.record_conflict(conflict("8841"));
        state.resolve_conflict("8841");
        assert!(state.conflicts[0].resolved);
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut state = SyncState::new();
        state.begin(SyncOperation::Update, Some("8841".to_string()));
        state.pending_count = 3;
        state.reset();
        assert_eq!(state, SyncState::default());
    }
}
