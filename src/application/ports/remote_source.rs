use crate::domain::entities::{AuditRecord, AuditRecordChanges, AuditRecordDraft};
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// The remote CRUD source of truth for audit records.
///
/// `create` and `update` return the authoritative stored representation,
/// including any server-assigned identifier. Implementations signal unknown
/// ids with [`AppError::NotFound`] and concurrent divergent modification
/// with [`AppError::ConflictDetected`].
#[async_trait]
pub trait RemoteAuditSource: Send + Sync {
    async fn list_all(&self) -> Result<Vec<AuditRecord>, AppError>;

    async fn get_by_id(&self, id: &RecordId) -> Result<AuditRecord, AppError>;

    async fn create(&self, draft: AuditRecordDraft) -> Result<AuditRecord, AppError>;

    async fn update(
        &self,
        id: &RecordId,
        changes: AuditRecordChanges,
    ) -> Result<AuditRecord, AppError>;

    async fn delete(&self, id: &RecordId) -> Result<(), AppError>;
}
