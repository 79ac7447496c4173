use crate::domain::entities::{AuditRecord, LocalRecord};
use crate::domain::value_objects::{RecordId, RecordStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable, query-able persistence of local records, independent of network
/// reachability. Every mutation is durable before the call returns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records whose status is not deleted. An empty store yields an
    /// empty vec, never an error.
    async fn get_all_active(&self) -> Result<Vec<LocalRecord>, AppError>;

    /// Single record lookup, excluding deleted records.
    async fn get_by_id(&self, id: &RecordId) -> Result<Option<LocalRecord>, AppError>;

    /// Upserts by external id. A record never stored before gets a fresh
    /// local row id; `last_modified` is bumped monotonically either way.
    async fn save(
        &self,
        record: AuditRecord,
        status: RecordStatus,
    ) -> Result<LocalRecord, AppError>;

    /// Soft delete. A missing id is a successful no-op.
    async fn mark_deleted(&self, id: &RecordId) -> Result<(), AppError>;

    /// Transitions a record to synced. A missing id is a no-op.
    async fn mark_synced(&self, id: &RecordId) -> Result<(), AppError>;

    /// Hard delete, used once the remote source has acknowledged a create
    /// replacement or a deletion. Idempotent.
    async fn remove(&self, id: &RecordId) -> Result<(), AppError>;

    /// Filtered listing, used to gather pending and deleted records for
    /// manual sync.
    async fn get_by_status(&self, status: RecordStatus) -> Result<Vec<LocalRecord>, AppError>;

    /// Stores or clears the remote version captured at conflict detection.
    async fn set_conflict_snapshot(
        &self,
        id: &RecordId,
        snapshot: Option<AuditRecord>,
    ) -> Result<(), AppError>;
}
