use crate::domain::entities::AuditRecord;
use crate::domain::value_objects::{RecordId, RecordStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable wrapper around an [`AuditRecord`] in the local store.
///
/// `local_id` is the storage row identity and stays put across the
/// external-id swap that happens when a create is acknowledged.
/// `last_modified` is bumped monotonically on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalRecord {
    pub local_id: String,
    pub record: AuditRecord,
    pub status: RecordStatus,
    pub last_modified: DateTime<Utc>,
    /// Remote version captured when a conflict was detected; cleared when a
    /// later save supersedes it.
    pub conflict_snapshot: Option<AuditRecord>,
}

impl LocalRecord {
    pub fn external_id(&self) -> &RecordId {
        &self.record.external_id
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RecordStatus::Deleted
    }
}
